#![forbid(unsafe_code)]
//! Linked-data vocabulary output for canonical unit records.
//!
//! [`emit`] turns [`uom_ucum::CanonicalRecord`]s into a [`Graph`] of
//! statements; [`Format`] serializes it as Turtle, N-Triples, JSON-LD,
//! RDF/XML or an HTML+RDFa fragment.

mod emitter;
mod error;
pub mod format;
mod graph;
pub mod namespaces;

pub use emitter::{cross_reference, emit, header, record_statements, GraphConfig};
pub use error::{Error, Result};
pub use format::Format;
pub use graph::{Graph, Object, Statement};
pub use namespaces::{Namespaces, DEFAULT_BASE_IRI};

/// Emits `records` and serializes the graph in one step.
pub fn render<'a, I>(records: I, config: &GraphConfig, format: Format) -> Result<String>
where
    I: IntoIterator<Item = &'a uom_ucum::CanonicalRecord>,
{
    let graph = emit(records, config);
    format.write(&graph, &config.namespaces)
}

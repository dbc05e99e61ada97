#![forbid(unsafe_code)]
//! UCUM unit-code parsing and canonicalization.
//!
//! A unit code such as `m/s` is parsed against the fixed UCUM symbol sets,
//! reduced to a list of [`UnitTerm`]s and turned into a [`CanonicalRecord`]
//! carrying the canonical code (`m.s-1`), its alternate spelling, the SI
//! symbol code, labels, synonyms and links to external ontologies.
//!
//! ```
//! let tables = uom_ucum::builtin_tables().build();
//! let record = uom_ucum::convert_one("m/s", &tables, &Default::default()).unwrap();
//! assert_eq!(record.canonical_code, "m.s-1");
//! assert_eq!(record.label, "metre per second");
//! ```

mod ast;
mod builder;
mod canonical;
mod convert;
mod error;
pub mod loader;
mod mapping;
mod parser;
pub mod symbols;
mod tables;

use once_cell::sync::Lazy;

pub use ast::{Component, Node, Operator, ParseTree, SimpleUnit, TermNode, UnitClass, UnitTerm};
pub use builder::{build_node, build_terms, MAX_TERMS};
pub use canonical::{
    alternative_ucum_code, CanonicalRecord, Canonicalizer, ResolvedTerm, DEFAULT_MAX_EXPANSION,
    KG_DEFINITION_EN,
};
pub use convert::{convert, convert_one, ConvertOptions};
pub use error::{Error, MetadataKind, Result};
pub use mapping::{matches_any_permutation, OntologyMappings, MAX_PERMUTATION_TERMS};
pub use parser::{parse, validate};
pub use tables::{LookupTables, LookupTablesBuilder, PrefixInfo, UnitInfo};

/// Language of the embedded tables.
pub const BUILTIN_LANG: &str = "en";

static BUILTIN_TABLES: Lazy<LookupTablesBuilder> = Lazy::new(|| {
    load_builtin().expect("failed to load embedded unit tables")
});

fn load_builtin() -> Result<LookupTablesBuilder> {
    let units = loader::parse_units(include_str!("../resources/units.tsv"), b'\t', BUILTIN_LANG)?;
    let prefixes =
        loader::parse_prefixes(include_str!("../resources/prefixes.tsv"), b'\t', BUILTIN_LANG)?;
    let exponents =
        loader::parse_exponents(include_str!("../resources/exponents.tsv"), b'\t', BUILTIN_LANG)?;
    Ok(LookupTablesBuilder::new(BUILTIN_LANG)
        .units(units)
        .prefixes(prefixes)
        .exponents(exponents))
}

/// English unit, prefix and exponent tables shipped with the crate, without
/// ontology mappings. Returned as a builder so callers can add or replace
/// entries before building.
pub fn builtin_tables() -> LookupTablesBuilder {
    BUILTIN_TABLES.clone()
}

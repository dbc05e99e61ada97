//! Serializers for [`Graph`].

mod html;
mod jsonld;
mod ntriples;
mod rdfxml;
mod turtle;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::namespaces::Namespaces;

pub use html::write_html;
pub use jsonld::{to_json_ld, write_json_ld};
pub use ntriples::write_ntriples;
pub use rdfxml::write_rdf_xml;
pub use turtle::write_turtle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Turtle,
    NTriples,
    JsonLd,
    RdfXml,
    Html,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Turtle,
        Format::NTriples,
        Format::JsonLd,
        Format::RdfXml,
        Format::Html,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Turtle => "ttl",
            Format::NTriples => "nt",
            Format::JsonLd => "json-ld",
            Format::RdfXml => "xml",
            Format::Html => "html",
        }
    }

    pub fn write(self, graph: &Graph, namespaces: &Namespaces) -> Result<String> {
        match self {
            Format::Turtle => write_turtle(graph, namespaces),
            Format::NTriples => write_ntriples(graph),
            Format::JsonLd => write_json_ld(graph, namespaces),
            Format::RdfXml => write_rdf_xml(graph, namespaces),
            Format::Html => write_html(graph, namespaces),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Ok(Format::Turtle),
            "nt" | "ntriples" | "n-triples" => Ok(Format::NTriples),
            "json-ld" | "jsonld" => Ok(Format::JsonLd),
            "xml" | "rdf" | "rdf/xml" => Ok(Format::RdfXml),
            "html" => Ok(Format::Html),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Escapes a literal for the quoted string forms of Turtle and N-Triples.
pub(crate) fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

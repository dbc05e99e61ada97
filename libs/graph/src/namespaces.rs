//! Namespace table used to compact IRIs into `prefix:local` names.
//!
//! The table is an immutable value handed to the emitter and the writers.
//! Every namespace is fixed except `unit`, which follows the configured base
//! IRI.

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const QUDT: &str = "http://qudt.org/vocab/unit/";
pub const OM: &str = "http://www.ontology-of-units-of-measure.org/resource/om-2/";
pub const OBO: &str = "http://purl.obolibrary.org/obo/";
pub const UO: &str = "http://purl.obolibrary.org/obo/UO_";
pub const OBOE: &str = "http://ecoinformatics.org/oboe/oboe.1.2/oboe-standards.owl#";
pub const NERC_P06: &str = "http://vocab.nerc.ac.uk/collection/P06/current/";

/// Default namespace for minted unit identifiers.
pub const DEFAULT_BASE_IRI: &str = "https://w3id.org/uom/";

const FIXED: &[(&str, &str)] = &[
    ("NERC_P06", NERC_P06),
    ("obo", OBO),
    ("OBOE", OBOE),
    ("OM", OM),
    ("owl", OWL),
    ("QUDT", QUDT),
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("skos", SKOS),
    ("UO", UO),
];

/// Bidirectional prefix ↔ namespace IRI table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespaces {
    entries: Vec<(String, String)>,
}

impl Namespaces {
    /// The fixed ontology namespaces plus `unit` bound to `base_iri`.
    pub fn standard(base_iri: &str) -> Self {
        let mut entries: Vec<(String, String)> = FIXED
            .iter()
            .map(|(prefix, iri)| (prefix.to_string(), iri.to_string()))
            .collect();
        entries.push(("unit".to_string(), base_iri.to_string()));
        entries.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(prefix, iri)| (prefix.as_str(), iri.as_str()))
    }

    pub fn iri(&self, prefix: &str) -> Option<&str> {
        self.iter().find(|(p, _)| *p == prefix).map(|(_, iri)| iri)
    }

    /// Splits `iri` into `(prefix, local)` using the longest matching
    /// namespace, so `UO_0000008` wins over `obo:UO_0000008`.
    pub fn split<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        self.iter()
            .filter(|(_, ns)| iri.starts_with(ns))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(prefix, ns)| (prefix, &iri[ns.len()..]))
    }

    /// `prefix:local` when the local part is a plain name, `None` otherwise.
    pub fn curie(&self, iri: &str) -> Option<String> {
        let (prefix, local) = self.split(iri)?;
        is_plain_local(local).then(|| format!("{prefix}:{local}"))
    }

    /// Expands `prefix:local`; anything else is returned unchanged.
    pub fn expand(&self, name: &str) -> String {
        match name.split_once(':') {
            Some((prefix, local)) => match self.iri(prefix) {
                Some(ns) => format!("{ns}{local}"),
                None => name.to_string(),
            },
            None => name.to_string(),
        }
    }
}

/// Letters, digits, `_` and `-`, not starting with `-`. Safe as a Turtle
/// local name and, when it starts with a letter or `_`, as an XML name.
fn is_plain_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

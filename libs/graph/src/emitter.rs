//! Graph emitter: one named individual per canonical record.

use once_cell::sync::Lazy;
use regex::Regex;
use uom_ucum::CanonicalRecord;

use crate::graph::{Graph, Object, Statement};
use crate::namespaces::{self, Namespaces, DEFAULT_BASE_IRI};

/// External ontologies whose term IRIs may be linked, with the namespace
/// each extracted identifier is re-anchored on.
static CROSS_REFERENCES: Lazy<Vec<(&'static str, Regex, &'static str)>> = Lazy::new(|| {
    [
        ("QUDT", r"(http://qudt\.org/vocab/unit/)(.*)", namespaces::QUDT),
        (
            "OM",
            r"(http://www\.ontology-of-units-of-measure\.org/resource/om-2/)(.*)",
            namespaces::OM,
        ),
        ("UO", r"(http://purl\.obolibrary\.org/obo/UO_)(.*)", namespaces::UO),
        (
            "OBOE",
            r"(http://ecoinformatics\.org/oboe/oboe\.1\.2/oboe-standards\.owl#)(.*)",
            namespaces::OBOE,
        ),
        (
            "NERC_P06",
            r"(http://vocab\.nerc\.ac\.uk/collection/P06/current/)(.*)(/)",
            namespaces::NERC_P06,
        ),
    ]
    .into_iter()
    .map(|(name, pattern, ns)| {
        (
            name,
            Regex::new(pattern).expect("valid cross-reference regex"),
            ns,
        )
    })
    .collect()
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphConfig {
    /// Namespace that minted unit identifiers and the `unit:` annotation
    /// properties live in.
    pub base_iri: String,
    pub namespaces: Namespaces,
}

impl GraphConfig {
    pub fn new(base_iri: impl Into<String>) -> Self {
        let base_iri = base_iri.into();
        let namespaces = Namespaces::standard(&base_iri);
        Self {
            base_iri,
            namespaces,
        }
    }

    /// IRI of the individual for `code`: the base IRI followed by the
    /// percent-encoded code.
    pub fn identifier(&self, code: &str) -> String {
        format!("{}{}", self.base_iri, urlencoding::encode(code))
    }

    pub fn si_code_property(&self) -> String {
        format!("{}SI_code", self.base_iri)
    }

    pub fn ucum_code_property(&self) -> String {
        format!("{}UCUM_code", self.base_iri)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_IRI)
    }
}

/// Canonical IRI for a mapped ontology term, or `None` when it belongs to
/// none of the known ontologies.
pub fn cross_reference(iri: &str) -> Option<String> {
    CROSS_REFERENCES.iter().find_map(|(_, pattern, ns)| {
        pattern
            .captures(iri)
            .map(|caps| format!("{}{}", ns, &caps[2]))
    })
}

/// Builds the graph for `records`: the annotation-property header once, then
/// the statements of every record.
pub fn emit<'a, I>(records: I, config: &GraphConfig) -> Graph
where
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let mut graph = Graph::new();
    graph.extend(header(config));
    let mut count = 0usize;
    for record in records {
        graph.extend(record_statements(record, config));
        count += 1;
    }
    tracing::debug!(records = count, statements = graph.len(), "emitted graph");
    graph
}

/// Declares `unit:SI_code` and `unit:UCUM_code` as annotation properties.
pub fn header(config: &GraphConfig) -> Vec<Statement> {
    let ns = &config.namespaces;
    let rdf_type = ns.expand("rdf:type");
    let label = ns.expand("rdfs:label");
    let annotation = ns.expand("owl:AnnotationProperty");
    let mut out = Vec::with_capacity(4);
    for (property, name) in [
        (config.si_code_property(), "SI code"),
        (config.ucum_code_property(), "UCUM code"),
    ] {
        out.push(Statement::new(
            property.clone(),
            rdf_type.clone(),
            Object::iri(annotation.clone()),
        ));
        out.push(Statement::new(property, label.clone(), Object::literal(name)));
    }
    out
}

pub fn record_statements(record: &CanonicalRecord, config: &GraphConfig) -> Vec<Statement> {
    let subject = config.identifier(&record.canonical_code);
    let lang = record.lang.as_str();
    let ns = &config.namespaces;
    let mut out = Vec::new();
    let mut add = |predicate: String, object: Object| {
        out.push(Statement::new(subject.clone(), predicate, object));
    };

    add(
        ns.expand("rdf:type"),
        Object::iri(ns.expand("owl:NamedIndividual")),
    );
    add(
        ns.expand("rdfs:label"),
        Object::lang_literal(&record.label, lang),
    );
    for synonym in &record.synonyms {
        add(
            ns.expand("skos:altLabel"),
            Object::lang_literal(synonym, lang),
        );
    }
    if let Some(definition) = &record.definition {
        add(
            ns.expand("skos:definition"),
            Object::lang_literal(definition, lang),
        );
    }
    if let Some(symbol_code) = &record.symbol_code {
        add(config.si_code_property(), Object::literal(symbol_code));
    }
    for code in record.ucum_codes() {
        add(config.ucum_code_property(), Object::literal(code));
    }

    let exact_match = ns.expand("skos:exactMatch");
    for code in &record.equivalent_codes {
        add(exact_match.clone(), Object::iri(config.identifier(code)));
    }
    for iri in &record.mapped_iris {
        match cross_reference(iri) {
            Some(target) => add(exact_match.clone(), Object::iri(target)),
            None => tracing::warn!(iri = %iri, unit = %record.canonical_code, "unknown mapping"),
        }
    }
    out
}

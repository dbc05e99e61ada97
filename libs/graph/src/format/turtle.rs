use std::fmt::Write;

use crate::error::Result;
use crate::graph::{Graph, Object};
use crate::namespaces::{Namespaces, RDF};

use super::escape_literal;

/// Turtle with a `@prefix` header, one block per subject and objects of a
/// repeated predicate joined with `,`.
pub fn write_turtle(graph: &Graph, namespaces: &Namespaces) -> Result<String> {
    let rdf_type = format!("{RDF}type");
    let mut out = String::new();
    for (prefix, iri) in namespaces.iter() {
        writeln!(out, "@prefix {prefix}: <{iri}> .")?;
    }

    for (subject, statements) in graph.by_subject() {
        let mut predicates: Vec<(&str, Vec<&Object>)> = Vec::new();
        for statement in statements {
            match predicates
                .iter_mut()
                .find(|(p, _)| *p == statement.predicate)
            {
                Some((_, objects)) => objects.push(&statement.object),
                None => predicates.push((statement.predicate.as_str(), vec![&statement.object])),
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", name(subject, namespaces))?;
        let last = predicates.len().saturating_sub(1);
        for (i, (predicate, objects)) in predicates.iter().enumerate() {
            let predicate = if *predicate == rdf_type {
                "a".to_string()
            } else {
                name(predicate, namespaces)
            };
            let objects = objects
                .iter()
                .map(|o| object(o, namespaces))
                .collect::<Vec<_>>()
                .join(",\n        ");
            let end = if i == last { '.' } else { ';' };
            writeln!(out, "    {predicate} {objects} {end}")?;
        }
    }
    Ok(out)
}

fn name(iri: &str, namespaces: &Namespaces) -> String {
    namespaces
        .curie(iri)
        .unwrap_or_else(|| format!("<{iri}>"))
}

fn object(object: &Object, namespaces: &Namespaces) -> String {
    match object {
        Object::Iri(iri) => name(iri, namespaces),
        Object::Literal { value, lang: None } => format!("\"{}\"", escape_literal(value)),
        Object::Literal {
            value,
            lang: Some(lang),
        } => format!("\"{}\"@{}", escape_literal(value), lang),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Statement;
    use crate::namespaces::{DEFAULT_BASE_IRI, RDFS, SKOS};

    #[test]
    fn groups_predicates_per_subject() {
        let ns = Namespaces::standard(DEFAULT_BASE_IRI);
        let subject = format!("{DEFAULT_BASE_IRI}m.s-1");
        let mut graph = Graph::new();
        graph.extend([
            Statement::new(
                subject.clone(),
                format!("{RDF}type"),
                Object::iri("http://www.w3.org/2002/07/owl#NamedIndividual"),
            ),
            Statement::new(
                subject.clone(),
                format!("{RDFS}label"),
                Object::lang_literal("metre per second", "en"),
            ),
            Statement::new(
                subject.clone(),
                format!("{SKOS}altLabel"),
                Object::lang_literal("meter per second", "en"),
            ),
        ]);

        let ttl = write_turtle(&graph, &ns).unwrap();
        assert!(
            ttl.starts_with("@prefix NERC_P06: <http://vocab.nerc.ac.uk/collection/P06/current/> .")
        );
        assert!(ttl.contains("<https://w3id.org/uom/m.s-1>\n    a owl:NamedIndividual ;\n"));
        assert!(ttl.contains("    rdfs:label \"metre per second\"@en ;\n"));
        assert!(ttl.contains("    skos:altLabel \"meter per second\"@en .\n"));
    }

    #[test]
    fn repeated_predicates_share_a_line_group() {
        let ns = Namespaces::standard(DEFAULT_BASE_IRI);
        let mut graph = Graph::new();
        graph.extend([
            Statement::new("http://x/s", format!("{SKOS}altLabel"), Object::literal("a")),
            Statement::new("http://x/s", format!("{SKOS}altLabel"), Object::literal("b")),
        ]);
        let ttl = write_turtle(&graph, &ns).unwrap();
        assert!(ttl.contains("    skos:altLabel \"a\",\n        \"b\" .\n"));
    }
}

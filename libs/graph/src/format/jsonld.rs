use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::graph::{Graph, Object};
use crate::namespaces::{Namespaces, RDF};

/// JSON-LD document with the namespace table as `@context` and one node
/// object per subject in `@graph`.
pub fn to_json_ld(graph: &Graph, namespaces: &Namespaces) -> Value {
    let rdf_type = format!("{RDF}type");
    let compact = |iri: &str| namespaces.curie(iri).unwrap_or_else(|| iri.to_string());

    let context: Map<String, Value> = namespaces
        .iter()
        .map(|(prefix, iri)| (prefix.to_string(), Value::String(iri.to_string())))
        .collect();

    let nodes: Vec<Value> = graph
        .by_subject()
        .into_iter()
        .map(|(subject, statements)| {
            let mut node = Map::new();
            node.insert("@id".into(), Value::String(compact(subject)));
            for statement in statements {
                let (key, value) = match &statement.object {
                    Object::Iri(iri) if statement.predicate == rdf_type => {
                        ("@type".to_string(), Value::String(compact(iri)))
                    }
                    Object::Iri(iri) => (
                        compact(&statement.predicate),
                        json!({ "@id": compact(iri) }),
                    ),
                    Object::Literal { value, lang: Some(lang) } => (
                        compact(&statement.predicate),
                        json!({ "@value": value, "@language": lang }),
                    ),
                    Object::Literal { value, lang: None } => {
                        (compact(&statement.predicate), json!({ "@value": value }))
                    }
                };
                if let Value::Array(items) = node
                    .entry(key)
                    .or_insert_with(|| Value::Array(Vec::new()))
                {
                    items.push(value);
                }
            }
            Value::Object(node)
        })
        .collect();

    json!({ "@context": context, "@graph": nodes })
}

pub fn write_json_ld(graph: &Graph, namespaces: &Namespaces) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json_ld(graph, namespaces))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Statement;
    use crate::namespaces::{DEFAULT_BASE_IRI, OWL, RDFS, SKOS};

    #[test]
    fn node_objects_use_context_prefixes() {
        let ns = Namespaces::standard(DEFAULT_BASE_IRI);
        let subject = format!("{DEFAULT_BASE_IRI}m.s-1");
        let mut graph = Graph::new();
        graph.extend([
            Statement::new(
                subject.clone(),
                format!("{RDF}type"),
                Object::iri(format!("{OWL}NamedIndividual")),
            ),
            Statement::new(
                subject.clone(),
                format!("{RDFS}label"),
                Object::lang_literal("metre per second", "en"),
            ),
            Statement::new(
                subject.clone(),
                format!("{SKOS}exactMatch"),
                Object::iri("http://qudt.org/vocab/unit/M-PER-SEC"),
            ),
        ]);

        let doc = to_json_ld(&graph, &ns);
        assert_eq!(doc["@context"]["skos"], SKOS);
        assert_eq!(doc["@context"]["unit"], DEFAULT_BASE_IRI);

        let node = &doc["@graph"][0];
        assert_eq!(node["@id"], "https://w3id.org/uom/m.s-1");
        assert_eq!(node["@type"], json!(["owl:NamedIndividual"]));
        assert_eq!(
            node["rdfs:label"],
            json!([{ "@value": "metre per second", "@language": "en" }])
        );
        assert_eq!(node["skos:exactMatch"], json!([{ "@id": "QUDT:M-PER-SEC" }]));
    }

    #[test]
    fn output_is_valid_json() {
        let ns = Namespaces::standard(DEFAULT_BASE_IRI);
        let text = write_json_ld(&Graph::new(), &ns).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["@graph"], json!([]));
    }
}

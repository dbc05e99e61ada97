use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::error::Result;
use crate::graph::{Graph, Object};
use crate::namespaces::{Namespaces, OWL, RDF, RDFS};

/// HTML fragment with RDFa annotations: one `<div>` per named individual,
/// ordered by label, listing linked resources and then literal values.
pub fn write_html(graph: &Graph, namespaces: &Namespaces) -> Result<String> {
    let rdf_type = format!("{RDF}type");
    let individual = Object::iri(format!("{OWL}NamedIndividual"));
    let label_predicate = format!("{RDFS}label");
    let compact = |iri: &str| namespaces.curie(iri).unwrap_or_else(|| iri.to_string());

    let mut labels: HashMap<&str, &str> = HashMap::new();
    for statement in graph.iter() {
        if statement.predicate == label_predicate {
            if let Object::Literal { value, .. } = &statement.object {
                labels.entry(statement.subject.as_str()).or_insert(value.as_str());
            }
        }
    }
    let label_of = |iri: &str| {
        labels
            .get(iri)
            .map(|l| l.to_string())
            .unwrap_or_else(|| compact(iri))
    };

    let mut individuals: Vec<(String, &str, Vec<&crate::graph::Statement>)> = graph
        .by_subject()
        .into_iter()
        .filter(|(_, statements)| {
            statements
                .iter()
                .any(|s| s.predicate == rdf_type && s.object == individual)
        })
        .map(|(subject, statements)| (label_of(subject), subject, statements))
        .collect();
    individuals.sort_by(|a, b| a.0.cmp(&b.0));

    let prefixes = namespaces
        .iter()
        .map(|(prefix, iri)| format!("{prefix}: {iri}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::new();
    writeln!(out, "<div prefix=\"{}\">", attr(&prefixes))?;
    for (label, subject, statements) in individuals {
        let mut links: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        let mut values: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for statement in statements {
            match &statement.object {
                Object::Iri(iri) => links.entry(&statement.predicate).or_default().push(iri),
                Object::Literal { value, .. } => {
                    values.entry(&statement.predicate).or_default().push(value)
                }
            }
        }

        writeln!(out, "<div resource=\"{}\">", attr(&compact(subject)))?;
        writeln!(out, "  <h3>{}</h3>", text(&label))?;
        writeln!(out, "  <p class=\"lead\">{}</p>", text(subject))?;
        writeln!(out, "  <ul>")?;
        for (predicate, objects) in links {
            writeln!(out, "    <li>")?;
            writeln!(
                out,
                "      <a href=\"{}\">{}</a>",
                attr(predicate),
                text(&label_of(predicate))
            )?;
            writeln!(out, "      <ul>")?;
            for object in objects {
                writeln!(out, "        <li>")?;
                writeln!(
                    out,
                    "          <a rel=\"{}\" resource=\"{}\" href=\"{}\">{}</a>",
                    attr(&compact(predicate)),
                    attr(&compact(object)),
                    attr(object),
                    text(&label_of(object)),
                )?;
                writeln!(out, "        </li>")?;
            }
            writeln!(out, "      </ul>")?;
            writeln!(out, "    </li>")?;
        }
        for (predicate, literals) in values {
            writeln!(out, "    <li>")?;
            writeln!(
                out,
                "      <a href=\"{}\">{}</a>",
                attr(predicate),
                text(&label_of(predicate))
            )?;
            writeln!(out, "      <ul>")?;
            for value in literals {
                writeln!(
                    out,
                    "        <li><span property=\"{}\">{}</span></li>",
                    attr(&compact(predicate)),
                    text(value),
                )?;
            }
            writeln!(out, "      </ul>")?;
            writeln!(out, "    </li>")?;
        }
        writeln!(out, "  </ul>")?;
        writeln!(out, "</div>")?;
    }
    writeln!(out, "</div>")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Statement;
    use crate::namespaces::{DEFAULT_BASE_IRI, SKOS};

    fn individual(graph: &mut Graph, code: &str, label: &str) -> String {
        let subject = format!("{DEFAULT_BASE_IRI}{code}");
        graph.extend([
            Statement::new(
                subject.clone(),
                format!("{RDF}type"),
                Object::iri(format!("{OWL}NamedIndividual")),
            ),
            Statement::new(
                subject.clone(),
                format!("{RDFS}label"),
                Object::lang_literal(label, "en"),
            ),
        ]);
        subject
    }

    #[test]
    fn individuals_sorted_by_label() {
        let ns = Namespaces::standard(DEFAULT_BASE_IRI);
        let mut graph = Graph::new();
        individual(&mut graph, "s", "second");
        individual(&mut graph, "m", "metre");
        let html = write_html(&graph, &ns).unwrap();
        let metre = html.find("<h3>metre</h3>").unwrap();
        let second = html.find("<h3>second</h3>").unwrap();
        assert!(metre < second);
        let nerc = "NERC_P06: http://vocab.nerc.ac.uk/collection/P06/current/";
        assert!(html.starts_with(&format!("<div prefix=\"{nerc}")));
        assert!(html.contains("<div resource=\"unit:m\">"));
    }

    #[test]
    fn links_use_target_labels_and_text_is_escaped() {
        let ns = Namespaces::standard(DEFAULT_BASE_IRI);
        let mut graph = Graph::new();
        let l = individual(&mut graph, "L", "litre <volume>");
        let lower = individual(&mut graph, "l", "litre");
        graph.insert(Statement::new(l, format!("{SKOS}exactMatch"), Object::iri(lower)));

        let html = write_html(&graph, &ns).unwrap();
        assert!(html.contains("<h3>litre &lt;volume&gt;</h3>"));
        assert!(html.contains(concat!(
            "<a rel=\"skos:exactMatch\" resource=\"unit:l\" ",
            "href=\"https://w3id.org/uom/l\">litre</a>"
        )));
        assert!(html.contains("<li><span property=\"rdfs:label\">litre</span></li>"));
    }
}

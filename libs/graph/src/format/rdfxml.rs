use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::graph::{Graph, Object};
use crate::namespaces::Namespaces;

/// RDF/XML with one `rdf:Description` per subject. Every predicate must
/// compact to a qualified name through `namespaces`.
pub fn write_rdf_xml(graph: &Graph, namespaces: &Namespaces) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(Error::xml)?;

    let mut root = BytesStart::new("rdf:RDF");
    for (prefix, iri) in namespaces.iter() {
        let key = format!("xmlns:{prefix}");
        root.push_attribute((key.as_str(), iri));
    }
    writer.write_event(Event::Start(root)).map_err(Error::xml)?;

    for (subject, statements) in graph.by_subject() {
        let mut description = BytesStart::new("rdf:Description");
        description.push_attribute(("rdf:about", subject));
        writer
            .write_event(Event::Start(description))
            .map_err(Error::xml)?;

        for statement in statements {
            let name = qualified_name(&statement.predicate, namespaces)?;
            let mut element = BytesStart::new(name.as_str());
            match &statement.object {
                Object::Iri(iri) => {
                    element.push_attribute(("rdf:resource", iri.as_str()));
                    writer.write_event(Event::Empty(element)).map_err(Error::xml)?;
                }
                Object::Literal { value, lang } => {
                    if let Some(lang) = lang {
                        element.push_attribute(("xml:lang", lang.as_str()));
                    }
                    writer.write_event(Event::Start(element)).map_err(Error::xml)?;
                    writer
                        .write_event(Event::Text(BytesText::new(value)))
                        .map_err(Error::xml)?;
                    writer
                        .write_event(Event::End(BytesEnd::new(name.as_str())))
                        .map_err(Error::xml)?;
                }
            }
        }

        writer
            .write_event(Event::End(BytesEnd::new("rdf:Description")))
            .map_err(Error::xml)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("rdf:RDF")))
        .map_err(Error::xml)?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn qualified_name(iri: &str, namespaces: &Namespaces) -> Result<String> {
    namespaces
        .split(iri)
        .filter(|(_, local)| is_xml_name(local))
        .map(|(prefix, local)| format!("{prefix}:{local}"))
        .ok_or_else(|| Error::NotQualifiable(iri.to_string()))
}

fn is_xml_name(local: &str) -> bool {
    let mut chars = local.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

use std::fmt::Write;

use crate::error::Result;
use crate::graph::{Graph, Object};

use super::escape_literal;

/// One statement per line, full IRIs, in graph order.
pub fn write_ntriples(graph: &Graph) -> Result<String> {
    let mut out = String::new();
    for statement in graph.iter() {
        write!(out, "<{}> <{}> ", statement.subject, statement.predicate)?;
        match &statement.object {
            Object::Iri(iri) => write!(out, "<{iri}>")?,
            Object::Literal { value, lang } => {
                write!(out, "\"{}\"", escape_literal(value))?;
                if let Some(lang) = lang {
                    write!(out, "@{lang}")?;
                }
            }
        }
        out.push_str(" .\n");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Statement;

    #[test]
    fn writes_full_iris_and_tagged_literals() {
        let mut graph = Graph::new();
        graph.insert(Statement::new(
            "http://x/s",
            "http://x/p",
            Object::lang_literal("say \"hi\"", "en"),
        ));
        graph.insert(Statement::new("http://x/s", "http://x/q", Object::iri("http://x/o")));
        assert_eq!(
            write_ntriples(&graph).unwrap(),
            concat!(
                "<http://x/s> <http://x/p> \"say \\\"hi\\\"\"@en .\n",
                "<http://x/s> <http://x/q> <http://x/o> .\n",
            )
        );
    }
}

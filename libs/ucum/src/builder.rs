//! Turns a parse tree into the ordered list of unit terms.

use crate::ast::{Component, Node, Operator, ParseTree, TermNode, UnitClass, UnitTerm};
use crate::error::{Error, Result};

/// Upper bound on the number of terms in one expression.
pub const MAX_TERMS: usize = 64;

/// Builds the terms of `tree` in source order.
///
/// Exponents default to 1. A component reached through `/` has its exponent
/// negated; when the expression starts with `/`, every other component is
/// negated as well.
pub fn build_terms(tree: &ParseTree) -> Result<Vec<UnitTerm>> {
    build_node(tree).map(Node::flatten)
}

/// Reduces the parse tree bottom-up into a [`Node`].
pub fn build_node(tree: &ParseTree) -> Result<Node> {
    let components = unwind(&tree.term);
    if components.len() > MAX_TERMS {
        return Err(structural(
            tree,
            format!("expression has more than {MAX_TERMS} terms"),
        ));
    }

    let mut node: Option<Node> = None;
    for (op, component) in components {
        let negate = op == Some(Operator::Divide) || tree.leading_slash;
        let term = Node::Term(build_term(tree, component, negate)?);
        node = Some(match node {
            None => term,
            Some(lhs) => Node::Sequence(vec![lhs, term]),
        });
    }
    node.ok_or_else(|| structural(tree, "expression has no terms".into()))
}

/// Walks the left-recursive `term` chain without recursion, returning each
/// component with the operator that introduced it.
fn unwind(term: &TermNode) -> Vec<(Option<Operator>, &Component)> {
    let mut out = Vec::new();
    let mut current = term;
    loop {
        match current {
            TermNode::Component(component) => {
                out.push((None, component));
                break;
            }
            TermNode::Operation { lhs, op, rhs } => {
                out.push((Some(*op), rhs));
                current = lhs;
            }
        }
    }
    out.reverse();
    out
}

fn build_term(tree: &ParseTree, component: &Component, negate: bool) -> Result<UnitTerm> {
    let mut term = match component {
        Component::Unit { unit, exponent } => UnitTerm::new(
            unit.prefix.unwrap_or(""),
            unit.symbol,
            unit.class,
            exponent.unwrap_or(1),
        ),
        Component::Factor(value) => UnitTerm::new("", value.to_string(), UnitClass::Factor, 1),
    };
    if term.exponent == 0 {
        return Err(structural(
            tree,
            format!("'{}' has a zero exponent", term.ucum_code()),
        ));
    }
    if negate {
        term.exponent = term
            .exponent
            .checked_neg()
            .ok_or_else(|| structural(tree, "exponent out of range".into()))?;
    }
    Ok(term)
}

fn structural(tree: &ParseTree, message: String) -> Error {
    Error::Structural {
        input: tree.source.clone(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn terms(input: &str) -> Vec<(String, i32)> {
        build_terms(&parse(input).unwrap())
            .unwrap()
            .into_iter()
            .map(|t| (t.ucum_code(), t.exponent))
            .collect()
    }

    fn pairs(items: &[(&str, i32)]) -> Vec<(String, i32)> {
        items.iter().map(|(c, e)| (c.to_string(), *e)).collect()
    }

    #[test]
    fn bare_unit_defaults_to_exponent_one() {
        assert_eq!(terms("m"), pairs(&[("m", 1)]));
    }

    #[test]
    fn division_negates_component_exponent() {
        assert_eq!(terms("m/s"), pairs(&[("m", 1), ("s", -1)]));
        assert_eq!(terms("m/s2"), pairs(&[("m", 1), ("s", -2)]));
        assert_eq!(terms("m/s-2"), pairs(&[("m", 1), ("s", 2)]));
    }

    #[test]
    fn explicit_sign_is_preserved() {
        assert_eq!(terms("m.s-1"), pairs(&[("m", 1), ("s", -1)]));
    }

    #[test]
    fn leading_slash_negates_whole_expression() {
        assert_eq!(terms("/s"), pairs(&[("s", -1)]));
        assert_eq!(terms("/s.m2"), pairs(&[("s", -1), ("m", -2)]));
        assert_eq!(terms("/s/m"), pairs(&[("s", -1), ("m", -1)]));
    }

    #[test]
    fn factor_becomes_term() {
        let built = build_terms(&parse("[ligne]/12").unwrap()).unwrap();
        assert_eq!(built[1], UnitTerm::new("", "12", UnitClass::Factor, -1));
    }

    #[test]
    fn exception_keeps_deci_prefix() {
        let built = build_terms(&parse("dar").unwrap()).unwrap();
        assert_eq!(built, vec![UnitTerm::new("d", "ar", UnitClass::Metric, 1)]);
    }

    #[test]
    fn zero_exponent_is_structural_failure() {
        for input in ["m0", "m.s-0", "/s0"] {
            let err = build_terms(&parse(input).unwrap()).unwrap_err();
            assert!(matches!(err, Error::Structural { .. }), "{input}: {err}");
        }
    }

    #[test]
    fn too_many_terms_is_structural_failure() {
        let input = vec!["m"; MAX_TERMS + 1].join(".");
        let err = build_terms(&parse(&input).unwrap()).unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
    }
}

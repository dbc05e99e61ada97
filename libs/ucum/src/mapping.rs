//! Mapping resolver: links canonical records to external ontology terms.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::ast::UnitTerm;
use crate::canonical::split_parts;

/// Above this many terms, order permutations are not enumerated.
pub const MAX_PERMUTATION_TERMS: usize = 6;

/// Ontology term IRI to the UCUM codes known to denote the same unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OntologyMappings {
    by_iri: BTreeMap<String, Vec<String>>,
    by_code: HashMap<String, BTreeSet<String>>,
}

impl OntologyMappings {
    pub fn insert(&mut self, iri: impl Into<String>, code: impl Into<String>) {
        let iri = iri.into();
        let code = code.into();
        self.by_code
            .entry(code.clone())
            .or_default()
            .insert(iri.clone());
        let codes = self.by_iri.entry(iri).or_default();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    pub fn extend(&mut self, other: OntologyMappings) {
        for (iri, codes) in other.by_iri {
            for code in codes {
                self.insert(iri.clone(), code);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_iri.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_iri.len()
    }

    /// Codes registered for `iri`, in insertion order.
    pub fn codes(&self, iri: &str) -> Option<&[String]> {
        self.by_iri.get(iri).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_iri
            .iter()
            .map(|(iri, codes)| (iri.as_str(), codes.as_slice()))
    }

    /// IRIs whose code list shares at least one code with `codes`. Exact
    /// string equality only; the result is sorted and free of duplicates.
    pub fn resolve<'a, I>(&self, codes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut iris = BTreeSet::new();
        for code in codes {
            if let Some(found) = self.by_code.get(code) {
                iris.extend(found.iter().cloned());
            }
        }
        iris.into_iter().collect()
    }

    /// IRIs with a code that spells `terms` in some order.
    pub fn resolve_permuted(&self, terms: &[UnitTerm]) -> Vec<String> {
        let iris: Vec<String> = self
            .by_iri
            .iter()
            .filter(|(_, codes)| matches_any_permutation(terms, codes.as_slice()))
            .map(|(iri, _)| iri.clone())
            .collect();
        tracing::debug!(matched = iris.len(), "resolved mappings by term order");
        iris
    }
}

/// True when one of `row_codes` is the term codes of `terms` joined with `.`
/// in any order, exponent `1` elided: `[m, s-1]` matches `m.s-1` and `s-1.m`.
///
/// Above [`MAX_PERMUTATION_TERMS`] terms only the source order matches.
pub fn matches_any_permutation<S: AsRef<str>>(terms: &[UnitTerm], row_codes: &[S]) -> bool {
    let mut parts: Vec<String> = terms
        .iter()
        .map(|t| t.with_exponent(&t.ucum_code()))
        .collect();
    if parts.len() > MAX_PERMUTATION_TERMS {
        let code = parts.join(".");
        return row_codes.iter().any(|row| row.as_ref() == code);
    }

    parts.sort_unstable();
    row_codes.iter().any(|row| {
        let mut row_parts = split_parts(row.as_ref());
        if row_parts.len() != parts.len() {
            return false;
        }
        row_parts.sort_unstable();
        row_parts.iter().zip(&parts).all(|(a, b)| *a == b.as_str())
    })
}

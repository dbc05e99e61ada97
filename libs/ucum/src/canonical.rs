//! Canonicalizer
//!
//! Turns the term list of one parsed unit code into a [`CanonicalRecord`]:
//! numerator/denominator partition, canonical and alternate UCUM codes, SI
//! symbol code, label, definition, synonyms and equivalent codes.
//!
//! Every input either produces a complete record or an error. Nothing here
//! emits a record with fields silently left empty because a lookup failed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{UnitClass, UnitTerm};
use crate::error::{Error, MetadataKind, Result};
use crate::tables::{LookupTables, UnitInfo};

/// Default cap on the size of any synonym or equivalent-code expansion.
pub const DEFAULT_MAX_EXPANSION: usize = 10_000;

pub const KG_DEFINITION_EN: &str = "An SI base unit which 1) is the SI unit of mass and 2) is \
    defined by taking the fixed numerical value of the Planck constant, h, to be \
    6.626 070 15 × 10⁻³⁴ when expressed in the unit joule second, which is equal to kilogram \
    square metre per second, where the metre and the second are defined in terms of c and ∆νCs.";

static NEGATIVE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^-]+)-([0-9]+)").expect("valid negative-part regex"));

/// A term with the fields derived from the lookup tables.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedTerm {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub term: UnitTerm,
    pub ucum_code: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub si_symbol_code: Option<String>,
    pub label: String,
    pub synonyms: Vec<String>,
    pub equivalent_codes: Vec<String>,
}

impl ResolvedTerm {
    /// Code with exponent as it appears in the canonical code.
    fn canonical_part(&self, code: &str) -> String {
        if self.term.is_denominator() {
            format!("{}{}", code, self.term.exponent)
        } else {
            self.term.with_exponent(code)
        }
    }
}

/// The canonical form of one input unit code.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CanonicalRecord {
    pub input: String,
    pub lang: String,
    /// Terms in source order, before canonical reordering.
    pub terms: Vec<UnitTerm>,
    pub numerator: Vec<ResolvedTerm>,
    pub denominator: Vec<ResolvedTerm>,
    pub canonical_code: String,
    pub alternate_code: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub symbol_code: Option<String>,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub definition: Option<String>,
    pub synonyms: Vec<String>,
    pub equivalent_codes: Vec<String>,
    pub mapped_iris: Vec<String>,
}

impl CanonicalRecord {
    /// The canonical code, followed by the alternate code when it differs.
    pub fn ucum_codes(&self) -> Vec<&str> {
        let mut codes = vec![self.canonical_code.as_str()];
        if self.alternate_code != self.canonical_code {
            codes.push(self.alternate_code.as_str());
        }
        codes
    }
}

/// Rewrites a canonical code with `/` before each negative-exponent part.
///
/// `m.s-1` becomes `m/s`, `s-2` becomes `/s2`, and a code without negative
/// parts is returned unchanged. Dots inside `[...]` are not separators.
pub fn alternative_ucum_code(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for (idx, part) in split_parts(code).into_iter().enumerate() {
        match NEGATIVE_PART.captures(part) {
            Some(caps) => {
                out.push('/');
                out.push_str(&caps[1]);
                let power = &caps[2];
                if power.parse::<u64>().map_or(true, |p| p > 1) {
                    out.push_str(power);
                }
            }
            None => {
                if idx > 0 {
                    out.push('.');
                }
                out.push_str(part);
            }
        }
    }
    out
}

/// Splits a code on `.` outside `[...]`.
pub(crate) fn split_parts(code: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in code.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                parts.push(&code[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&code[start..]);
    parts
}

pub struct Canonicalizer<'t> {
    tables: &'t LookupTables,
    max_expansion: usize,
}

impl<'t> Canonicalizer<'t> {
    pub fn new(tables: &'t LookupTables) -> Self {
        Self {
            tables,
            max_expansion: DEFAULT_MAX_EXPANSION,
        }
    }

    pub fn with_max_expansion(mut self, max_expansion: usize) -> Self {
        self.max_expansion = max_expansion;
        self
    }

    /// Builds the canonical record for `terms`, parsed from `input`.
    ///
    /// `mapped_iris` is left empty; the mapping resolver fills it.
    pub fn canonicalize(&self, input: &str, terms: Vec<UnitTerm>) -> Result<CanonicalRecord> {
        // Any conventional term suppresses SI symbol codes for the whole expression.
        let conventional = terms.iter().any(|t| t.class.is_conventional());

        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for term in &terms {
            let resolved = self.resolve_term(input, term, conventional)?;
            if term.is_denominator() {
                denominator.push(resolved);
            } else {
                numerator.push(resolved);
            }
        }
        sort_terms(&mut numerator);
        sort_terms(&mut denominator);

        let canonical_code = numerator
            .iter()
            .chain(denominator.iter())
            .map(|t| t.canonical_part(&t.ucum_code))
            .collect::<Vec<_>>()
            .join(".");
        let alternate_code = alternative_ucum_code(&canonical_code);
        let symbol_code = symbol_code(&numerator, &denominator);
        let label = canonical_label(&numerator, &denominator);
        let definition = self.definition(&numerator, &denominator);
        let synonyms = self.synonyms(input, &numerator, &denominator)?;
        let equivalent_codes =
            self.equivalent_codes(
                input,
                &numerator,
                &denominator,
                &canonical_code,
                &alternate_code,
            )?;

        Ok(CanonicalRecord {
            input: input.to_string(),
            lang: self.tables.lang().to_string(),
            terms,
            numerator,
            denominator,
            canonical_code,
            alternate_code,
            symbol_code,
            label,
            definition,
            synonyms,
            equivalent_codes,
            mapped_iris: Vec::new(),
        })
    }

    fn resolve_term(
        &self,
        input: &str,
        term: &UnitTerm,
        conventional: bool,
    ) -> Result<ResolvedTerm> {
        let ucum_code = term.ucum_code();
        if term.class == UnitClass::Factor {
            return Ok(ResolvedTerm {
                term: term.clone(),
                label: term.base_unit.clone(),
                ucum_code,
                si_symbol_code: None,
                synonyms: Vec::new(),
                equivalent_codes: Vec::new(),
            });
        }

        let info = self.unit_info(input, &term.base_unit)?;
        let prefix_label = self.prefix_label(input, &term.prefix)?;

        let si_symbol_code = if !conventional && term.class.is_metric() {
            match &info.si_symbol {
                Some(symbol) => Some(format!("{}{}", term.prefix, symbol)),
                None => {
                    tracing::warn!(unit = %term.base_unit, "no SI symbol registered");
                    None
                }
            }
        } else {
            None
        };

        let label = self.label_part(prefix_label, &info.label, term.exponent);
        let synonyms = info
            .synonyms
            .iter()
            .map(|synonym| self.label_part(prefix_label, synonym, term.exponent))
            .collect();
        let equivalent_codes = info
            .equivalent_codes
            .iter()
            .map(|code| format!("{}{}", term.prefix, code))
            .collect();

        Ok(ResolvedTerm {
            term: term.clone(),
            ucum_code,
            si_symbol_code,
            label,
            synonyms,
            equivalent_codes,
        })
    }

    fn unit_info(&self, input: &str, symbol: &str) -> Result<&'t UnitInfo> {
        self.tables
            .unit(symbol)
            .ok_or_else(|| Error::MissingMetadata {
                input: input.to_string(),
                kind: MetadataKind::Unit,
                symbol: symbol.to_string(),
            })
    }

    fn prefix_label(&self, input: &str, prefix: &str) -> Result<&'t str> {
        if prefix.is_empty() {
            return Ok("");
        }
        self.tables
            .prefix(prefix)
            .map(|p| p.label.as_str())
            .ok_or_else(|| Error::MissingMetadata {
                input: input.to_string(),
                kind: MetadataKind::Prefix,
                symbol: prefix.to_string(),
            })
    }

    /// `[<exponent label> ]<prefix label><unit label>`
    fn label_part(&self, prefix_label: &str, unit_label: &str, exponent: i32) -> String {
        // English elision: hectare, decare.
        let prefix_label = if unit_label == "are" && matches!(prefix_label, "hecto" | "deca") {
            &prefix_label[..prefix_label.len() - 1]
        } else {
            prefix_label
        };
        match self.tables.exponent_label(exponent) {
            Some(power) => format!("{power} {prefix_label}{unit_label}"),
            None => format!("{prefix_label}{unit_label}"),
        }
    }

    /// `10^<n>` for a prefixed term, `1` otherwise.
    fn power_of_ten(&self, prefix: &str) -> Option<String> {
        if prefix.is_empty() {
            return Some("1".to_string());
        }
        let exponent = self.tables.prefix(prefix)?.exponent?;
        Some(format!("10^{exponent}"))
    }

    fn definition(
        &self,
        numerator: &[ResolvedTerm],
        denominator: &[ResolvedTerm],
    ) -> Option<String> {
        if numerator
            .iter()
            .chain(denominator)
            .any(|t| t.term.class == UnitClass::Factor)
        {
            return None;
        }

        if denominator.is_empty() && numerator.len() == 1 && numerator[0].term.exponent == 1 {
            let term = &numerator[0].term;
            let info = self.tables.unit(&term.base_unit)?;
            if term.prefix.is_empty() {
                return info.definition.clone();
            }
            if term.prefix == "k" && term.base_unit == "g" && self.tables.lang() == "en" {
                return Some(KG_DEFINITION_EN.to_string());
            }
            let power = self.power_of_ten(&term.prefix)?;
            return Some(format!("A unit which is equal to {} {}.", power, info.label));
        }

        let num_parts = self.definition_parts(numerator)?;
        let denom_parts = self.definition_parts(denominator)?;
        let definition = match (num_parts.is_empty(), denom_parts.is_empty()) {
            (false, true) => format!("A unit which is equal to {}.", num_parts.join(" by ")),
            (true, false) => format!(
                "A unit which is equal to the reciprocal of {}.",
                denom_parts.join(" by ")
            ),
            (false, false) => format!(
                "A unit which is equal to {} per {}.",
                num_parts.join(" by "),
                denom_parts.join(" by ")
            ),
            (true, true) => return None,
        };
        Some(definition)
    }

    /// `<power of ten or 1> [<exponent label>] <unit label>` per term.
    fn definition_parts(&self, terms: &[ResolvedTerm]) -> Option<Vec<String>> {
        terms
            .iter()
            .map(|t| {
                let info = self.tables.unit(&t.term.base_unit)?;
                let power = self.power_of_ten(&t.term.prefix)?;
                Some(match self.tables.exponent_label(t.term.exponent) {
                    Some(exponent) => format!("{} {} {}", power, exponent, info.label),
                    None => format!("{} {}", power, info.label),
                })
            })
            .collect()
    }

    fn synonyms(
        &self,
        input: &str,
        numerator: &[ResolvedTerm],
        denominator: &[ResolvedTerm],
    ) -> Result<Vec<String>> {
        if denominator.is_empty() {
            return self.synonym_product(input, numerator);
        }
        if numerator.is_empty() {
            return Ok(self
                .synonym_product(input, denominator)?
                .into_iter()
                .map(|s| format!("reciprocal {s}"))
                .collect());
        }

        let mut num = self.synonym_product(input, numerator)?;
        let mut denom = self.synonym_product(input, denominator)?;
        if num.is_empty() && denom.is_empty() {
            return Ok(Vec::new());
        }
        if num.is_empty() {
            num.push(joined_labels(numerator));
        }
        if denom.is_empty() {
            denom.push(joined_labels(denominator));
        }
        self.check_expansion(input, num.len().saturating_mul(denom.len()))?;
        Ok(num
            .iter()
            .flat_map(|n| denom.iter().map(move |d| format!("{n} per {d}")))
            .collect())
    }

    /// In-order combinations of each term's synonyms, using a term's label
    /// where it has none. Empty when no term has synonyms.
    fn synonym_product(&self, input: &str, terms: &[ResolvedTerm]) -> Result<Vec<String>> {
        if terms.iter().all(|t| t.synonyms.is_empty()) {
            return Ok(Vec::new());
        }
        let lists: Vec<Vec<String>> = terms
            .iter()
            .map(|t| {
                if t.synonyms.is_empty() {
                    vec![t.label.clone()]
                } else {
                    t.synonyms.clone()
                }
            })
            .collect();
        self.check_expansion(input, expansion_size(&lists))?;
        Ok(cartesian(&lists, " "))
    }

    fn equivalent_codes(
        &self,
        input: &str,
        numerator: &[ResolvedTerm],
        denominator: &[ResolvedTerm],
        canonical_code: &str,
        alternate_code: &str,
    ) -> Result<Vec<String>> {
        let terms: Vec<&ResolvedTerm> = numerator.iter().chain(denominator).collect();
        let mut codes = Vec::new();

        if terms.iter().any(|t| !t.equivalent_codes.is_empty()) {
            let lists: Vec<Vec<String>> = terms
                .iter()
                .map(|t| {
                    if t.equivalent_codes.is_empty() {
                        vec![t.canonical_part(&t.ucum_code)]
                    } else {
                        t.equivalent_codes
                            .iter()
                            .map(|code| t.canonical_part(code))
                            .collect()
                    }
                })
                .collect();
            self.check_expansion(input, expansion_size(&lists))?;
            codes = cartesian(&lists, ".");
        }

        for code in [canonical_code, alternate_code] {
            codes.extend(self.tables.equivalents_of(code).map(str::to_string));
        }

        let mut seen = std::collections::HashSet::new();
        codes.retain(|code| {
            code != canonical_code && code != alternate_code && seen.insert(code.clone())
        });
        Ok(codes)
    }

    fn check_expansion(&self, input: &str, size: usize) -> Result<()> {
        if size > self.max_expansion {
            return Err(Error::Structural {
                input: input.to_string(),
                message: format!(
                    "expansion of {size} variants exceeds the limit of {}",
                    self.max_expansion
                ),
            });
        }
        Ok(())
    }
}

/// Case-insensitive by UCUM code, ties broken by the full term.
fn sort_terms(terms: &mut [ResolvedTerm]) {
    terms.sort_by(|a, b| {
        a.ucum_code
            .to_lowercase()
            .cmp(&b.ucum_code.to_lowercase())
            .then_with(|| a.term.cmp(&b.term))
    });
}

fn symbol_code(numerator: &[ResolvedTerm], denominator: &[ResolvedTerm]) -> Option<String> {
    numerator
        .iter()
        .chain(denominator)
        .map(|t| {
            t.si_symbol_code
                .as_deref()
                .map(|symbol| t.canonical_part(symbol))
        })
        .collect::<Option<Vec<_>>>()
        .map(|parts| parts.join(" "))
}

fn canonical_label(numerator: &[ResolvedTerm], denominator: &[ResolvedTerm]) -> String {
    if denominator.is_empty() {
        return joined_labels(numerator);
    }
    if numerator.is_empty() {
        return format!("reciprocal {}", joined_labels(denominator));
    }
    format!(
        "{} per {}",
        joined_labels(numerator),
        joined_labels(denominator)
    )
}

fn joined_labels(terms: &[ResolvedTerm]) -> String {
    terms
        .iter()
        .map(|t| t.label.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn expansion_size(lists: &[Vec<String>]) -> usize {
    lists
        .iter()
        .fold(1usize, |acc, list| acc.saturating_mul(list.len()))
}

/// Every in-order combination of one element per list, joined by `sep`.
fn cartesian(lists: &[Vec<String>], sep: &str) -> Vec<String> {
    let mut out = vec![String::new()];
    for (i, list) in lists.iter().enumerate() {
        out = out
            .iter()
            .flat_map(|prefix| {
                list.iter().map(move |item| {
                    if i == 0 {
                        item.clone()
                    } else {
                        format!("{prefix}{sep}{item}")
                    }
                })
            })
            .collect();
    }
    out
}

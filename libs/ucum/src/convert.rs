//! Batch conversion of unit codes into canonical records.

use crate::builder::build_terms;
use crate::canonical::{CanonicalRecord, Canonicalizer, DEFAULT_MAX_EXPANSION};
use crate::error::Result;
use crate::parser::parse;
use crate::tables::LookupTables;

/// Options for [`convert`] and [`convert_one`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Abort the batch on the first invalid input instead of skipping it.
    pub strict: bool,
    /// Also match ontology mappings against every order of the term codes.
    pub match_permutations: bool,
    /// Cap on synonym and equivalent-code expansions per record.
    pub max_expansion: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            strict: false,
            match_permutations: true,
            max_expansion: DEFAULT_MAX_EXPANSION,
        }
    }
}

impl ConvertOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// Parses, builds and canonicalizes a single unit code, then resolves its
/// ontology mappings.
pub fn convert_one(
    input: &str,
    tables: &LookupTables,
    options: &ConvertOptions,
) -> Result<CanonicalRecord> {
    let tree = parse(input)?;
    let terms = build_terms(&tree)?;
    let mut record = Canonicalizer::new(tables)
        .with_max_expansion(options.max_expansion)
        .canonicalize(input, terms)?;

    let mappings = tables.mappings();
    if !mappings.is_empty() {
        let mut iris = mappings.resolve(
            record
                .equivalent_codes
                .iter()
                .map(String::as_str)
                .chain([record.canonical_code.as_str(), record.alternate_code.as_str()]),
        );
        if options.match_permutations {
            iris.extend(mappings.resolve_permuted(&record.terms));
            iris.sort();
            iris.dedup();
        }
        record.mapped_iris = iris;
    }

    tracing::debug!(
        input,
        canonical = %record.canonical_code,
        mapped = record.mapped_iris.len(),
        "converted unit code"
    );
    Ok(record)
}

/// Converts every input in order.
///
/// In strict mode the first failure is returned and nothing else is produced.
/// Otherwise failing inputs are logged and skipped; the remaining records keep
/// their input order.
pub fn convert<I, S>(
    inputs: I,
    tables: &LookupTables,
    options: &ConvertOptions,
) -> Result<Vec<CanonicalRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for input in inputs {
        let input = input.as_ref();
        match convert_one(input, tables, options) {
            Ok(record) => records.push(record),
            Err(err) if options.strict => return Err(err),
            Err(err) => {
                skipped += 1;
                tracing::error!(input, error = %err, "skipping unit code");
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(
            converted = records.len(),
            skipped,
            "some unit codes could not be converted"
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tables::UnitInfo;

    fn tables() -> LookupTables {
        LookupTables::builder("en")
            .unit("m", UnitInfo::new("metre").with_symbol("m"))
            .unit("s", UnitInfo::new("second").with_symbol("s"))
            .mapping("http://qudt.org/vocab/unit/M-PER-SEC", "m.s-1")
            .mapping("http://example.org/unit/sm", "s-1.m")
            .build()
    }

    #[test]
    fn lenient_mode_skips_invalid_inputs() {
        let tables = tables();
        let records = convert(["m", "xyz", "m/s"], &tables, &ConvertOptions::default()).unwrap();
        let codes: Vec<_> = records.iter().map(|r| r.canonical_code.as_str()).collect();
        assert_eq!(codes, vec!["m", "m.s-1"]);
    }

    #[test]
    fn strict_mode_aborts() {
        let tables = tables();
        let err = convert(["m", "xyz", "m/s"], &tables, &ConvertOptions::strict()).unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
        assert_eq!(err.input(), Some("xyz"));
    }

    #[test]
    fn mappings_resolve_through_alternate_spelling() {
        let tables = tables();
        let record = convert_one("m/s", &tables, &ConvertOptions::default()).unwrap();
        assert_eq!(
            record.mapped_iris,
            vec![
                "http://example.org/unit/sm".to_string(),
                "http://qudt.org/vocab/unit/M-PER-SEC".to_string(),
            ]
        );
    }

    #[test]
    fn permutations_can_be_disabled() {
        let tables = tables();
        let options = ConvertOptions {
            match_permutations: false,
            ..ConvertOptions::default()
        };
        let record = convert_one("m/s", &tables, &options).unwrap();
        assert_eq!(
            record.mapped_iris,
            vec!["http://qudt.org/vocab/unit/M-PER-SEC".to_string()]
        );
    }

    #[test]
    fn missing_metadata_is_reported_per_input() {
        let tables = tables();
        let err = convert_one("kg", &tables, &ConvertOptions::strict()).unwrap_err();
        assert!(matches!(err, Error::MissingMetadata { .. }));
    }
}

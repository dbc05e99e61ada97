//! Lookup tables consulted by the canonicalizer.
//!
//! Tables are assembled once through [`LookupTablesBuilder`] and are read-only
//! afterwards, so a single [`LookupTables`] can be shared across workers.

use std::collections::{BTreeSet, HashMap};

use crate::mapping::OntologyMappings;

/// Metadata for one UCUM unit symbol, in the language of the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitInfo {
    /// Official SI symbol, when the unit has one.
    pub si_symbol: Option<String>,
    pub label: String,
    pub definition: Option<String>,
    pub synonyms: Vec<String>,
    /// Alternate UCUM spellings of the same unit.
    pub equivalent_codes: Vec<String>,
}

impl UnitInfo {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.si_symbol = Some(symbol.into());
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_equivalent_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equivalent_codes = codes.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixInfo {
    pub label: String,
    /// Base-10 exponent (`3` for kilo).
    pub exponent: Option<i32>,
}

impl PrefixInfo {
    pub fn new(label: impl Into<String>, exponent: i32) -> Self {
        Self {
            label: label.into(),
            exponent: Some(exponent),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LookupTablesBuilder {
    lang: String,
    units: HashMap<String, UnitInfo>,
    prefixes: HashMap<String, PrefixInfo>,
    exponents: HashMap<u32, String>,
    mappings: OntologyMappings,
}

impl LookupTablesBuilder {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            units: HashMap::new(),
            prefixes: HashMap::new(),
            exponents: HashMap::new(),
            mappings: OntologyMappings::default(),
        }
    }

    pub fn unit(mut self, symbol: impl Into<String>, info: UnitInfo) -> Self {
        self.units.insert(symbol.into(), info);
        self
    }

    pub fn prefix(mut self, symbol: impl Into<String>, info: PrefixInfo) -> Self {
        self.prefixes.insert(symbol.into(), info);
        self
    }

    pub fn exponent(mut self, power: u32, label: impl Into<String>) -> Self {
        self.exponents.insert(power, label.into());
        self
    }

    pub fn mapping(mut self, iri: impl Into<String>, code: impl Into<String>) -> Self {
        self.mappings.insert(iri, code);
        self
    }

    /// Replaces the unit table.
    pub fn units(mut self, units: HashMap<String, UnitInfo>) -> Self {
        self.units = units;
        self
    }

    /// Replaces the prefix table.
    pub fn prefixes(mut self, prefixes: HashMap<String, PrefixInfo>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Replaces the exponent-label table.
    pub fn exponents(mut self, exponents: HashMap<u32, String>) -> Self {
        self.exponents = exponents;
        self
    }

    /// Adds every row of `mappings` to the mapping table.
    pub fn extend_mappings(mut self, mappings: OntologyMappings) -> Self {
        self.mappings.extend(mappings);
        self
    }

    /// Drops all ontology mappings.
    pub fn without_mappings(mut self) -> Self {
        self.mappings = OntologyMappings::default();
        self
    }

    pub fn build(self) -> LookupTables {
        let mut equivalences: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (symbol, info) in &self.units {
            for code in &info.equivalent_codes {
                equivalences
                    .entry(symbol.clone())
                    .or_default()
                    .insert(code.clone());
                equivalences
                    .entry(code.clone())
                    .or_default()
                    .insert(symbol.clone());
            }
        }

        LookupTables {
            lang: self.lang,
            units: self.units,
            prefixes: self.prefixes,
            exponents: self.exponents,
            mappings: self.mappings,
            equivalences,
        }
    }
}

/// The four caller-supplied tables plus the indexes derived from them.
#[derive(Clone, Debug)]
pub struct LookupTables {
    lang: String,
    units: HashMap<String, UnitInfo>,
    prefixes: HashMap<String, PrefixInfo>,
    exponents: HashMap<u32, String>,
    mappings: OntologyMappings,
    /// Symmetric code-to-code equivalences derived from the unit table.
    equivalences: HashMap<String, BTreeSet<String>>,
}

impl LookupTables {
    pub fn builder(lang: impl Into<String>) -> LookupTablesBuilder {
        LookupTablesBuilder::new(lang)
    }

    /// Language of every label, definition and synonym in these tables.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn unit(&self, symbol: &str) -> Option<&UnitInfo> {
        self.units.get(symbol)
    }

    pub fn prefix(&self, symbol: &str) -> Option<&PrefixInfo> {
        self.prefixes.get(symbol)
    }

    /// Label for the absolute value of `exponent` (`"square"` for 2 and -2).
    pub fn exponent_label(&self, exponent: i32) -> Option<&str> {
        self.exponents
            .get(&exponent.unsigned_abs())
            .map(String::as_str)
    }

    pub fn mappings(&self) -> &OntologyMappings {
        &self.mappings
    }

    /// Codes registered as equivalent to `code`, in either direction.
    pub fn equivalents_of(&self, code: &str) -> impl Iterator<Item = &str> {
        self.equivalences
            .get(code)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

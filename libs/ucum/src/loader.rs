//! Delimited-file loaders for the lookup tables.
//!
//! Files are tab-separated unless their name ends in `.csv`. A leading UTF-8
//! byte-order mark is ignored. List-valued cells are `|`-separated and empty
//! cells mean "none".

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use csv::StringRecord;

use crate::error::{Error, Result};
use crate::mapping::OntologyMappings;
use crate::tables::{PrefixInfo, UnitInfo};

/// Unit table: `UCUM_symbol, SI_symbol, label_<lang>, definition_<lang>`,
/// optionally `exact_synonym_<lang>` and `equivalent_code`.
pub fn load_units(path: impl AsRef<Path>, lang: &str) -> Result<HashMap<String, UnitInfo>> {
    let (text, delimiter) = read_table(path.as_ref())?;
    parse_units(&text, delimiter, lang)
}

/// Prefix table: `symbol, label_<lang>, prefix_num`.
pub fn load_prefixes(path: impl AsRef<Path>, lang: &str) -> Result<HashMap<String, PrefixInfo>> {
    let (text, delimiter) = read_table(path.as_ref())?;
    parse_prefixes(&text, delimiter, lang)
}

/// Exponent table: `power, label_<lang>`.
pub fn load_exponents(path: impl AsRef<Path>, lang: &str) -> Result<HashMap<u32, String>> {
    let (text, delimiter) = read_table(path.as_ref())?;
    parse_exponents(&text, delimiter, lang)
}

/// Mapping table: `IRI, UCUM`, one row per code.
pub fn load_mappings(path: impl AsRef<Path>) -> Result<OntologyMappings> {
    let (text, delimiter) = read_table(path.as_ref())?;
    parse_mappings(&text, delimiter)
}

/// Reads the first column of every row, trimmed, skipping blank rows.
pub fn load_codes(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let (text, delimiter) = read_table(path.as_ref())?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut codes = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(code) = record.get(0).map(str::trim).filter(|c| !c.is_empty()) {
            codes.push(code.to_string());
        }
    }
    Ok(codes)
}

pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

fn read_table(path: &Path) -> Result<(String, u8)> {
    let text = fs::read_to_string(path)?;
    let text = match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    };
    Ok((text, delimiter_for(path)))
}

pub fn parse_units(text: &str, delimiter: u8, lang: &str) -> Result<HashMap<String, UnitInfo>> {
    let mut table = Table::new(text, delimiter)?;
    let symbol = table.column("UCUM_symbol")?;
    let si_symbol = table.column("SI_symbol")?;
    let label = table.column(&format!("label_{lang}"))?;
    let definition = table.column(&format!("definition_{lang}"))?;
    let synonyms = table.optional_column(&format!("exact_synonym_{lang}"));
    let equivalents = table.optional_column("equivalent_code");

    let mut units = HashMap::new();
    for record in table.records()? {
        let Some(code) = non_empty(&record, Some(symbol)) else {
            continue;
        };
        let info = UnitInfo {
            si_symbol: non_empty(&record, Some(si_symbol)).map(str::to_string),
            label: cell(&record, label).to_string(),
            definition: non_empty(&record, Some(definition)).map(str::to_string),
            synonyms: split_list(non_empty(&record, synonyms)),
            equivalent_codes: split_list(non_empty(&record, equivalents)),
        };
        units.insert(code.to_string(), info);
    }
    Ok(units)
}

pub fn parse_prefixes(
    text: &str,
    delimiter: u8,
    lang: &str,
) -> Result<HashMap<String, PrefixInfo>> {
    let mut table = Table::new(text, delimiter)?;
    let symbol = table.column("symbol")?;
    let label = table.column(&format!("label_{lang}"))?;
    let number = table.column("prefix_num")?;

    let mut prefixes = HashMap::new();
    for record in table.records()? {
        let Some(code) = non_empty(&record, Some(symbol)) else {
            continue;
        };
        let exponent = match non_empty(&record, Some(number)) {
            None => None,
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                Error::Table(format!("invalid prefix_num '{raw}' for prefix '{code}'"))
            })?),
        };
        prefixes.insert(
            code.to_string(),
            PrefixInfo {
                label: cell(&record, label).to_string(),
                exponent,
            },
        );
    }
    Ok(prefixes)
}

pub fn parse_exponents(text: &str, delimiter: u8, lang: &str) -> Result<HashMap<u32, String>> {
    let mut table = Table::new(text, delimiter)?;
    let power = table.column("power")?;
    let label = table.column(&format!("label_{lang}"))?;

    let mut exponents = HashMap::new();
    for record in table.records()? {
        let Some(raw) = non_empty(&record, Some(power)) else {
            continue;
        };
        let value = raw
            .parse::<u32>()
            .map_err(|_| Error::Table(format!("invalid power '{raw}'")))?;
        exponents.insert(value, cell(&record, label).to_string());
    }
    Ok(exponents)
}

pub fn parse_mappings(text: &str, delimiter: u8) -> Result<OntologyMappings> {
    let mut table = Table::new(text, delimiter)?;
    let iri = table.column("IRI")?;
    let code = table.column("UCUM")?;

    let mut mappings = OntologyMappings::default();
    for record in table.records()? {
        let cells = (non_empty(&record, Some(iri)), non_empty(&record, Some(code)));
        if let (Some(iri), Some(code)) = cells {
            mappings.insert(iri, code);
        }
    }
    Ok(mappings)
}

struct Table<'a> {
    reader: csv::Reader<&'a [u8]>,
    headers: StringRecord,
}

impl<'a> Table<'a> {
    fn new(text: &'a str, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = reader.headers()?.clone();
        Ok(Self { reader, headers })
    }

    fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.optional_column(name)
            .ok_or_else(|| Error::Table(format!("missing column '{name}'")))
    }

    fn records(&mut self) -> Result<Vec<StringRecord>> {
        self.reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

fn non_empty(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index.map(|i| cell(record, i)).filter(|value| !value.is_empty())
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unit_rows() {
        let text = "UCUM_symbol\tSI_symbol\tlabel_en\tdefinition_en\t\
                    exact_synonym_en\tequivalent_code\n\
                    L\tL\tlitre\tA unit of volume.\tliter\tl\n\
                    %\t\tpercent\t\t\t\n";
        let units = parse_units(text, b'\t', "en").unwrap();
        let litre = &units["L"];
        assert_eq!(litre.si_symbol.as_deref(), Some("L"));
        assert_eq!(litre.synonyms, vec!["liter"]);
        assert_eq!(litre.equivalent_codes, vec!["l"]);
        let percent = &units["%"];
        assert_eq!(percent.si_symbol, None);
        assert_eq!(percent.definition, None);
        assert!(percent.synonyms.is_empty());
    }

    #[test]
    fn synonym_columns_are_optional() {
        let text = "UCUM_symbol,SI_symbol,label_fr,definition_fr\nm,m,mètre,\n";
        let units = parse_units(text, b',', "fr").unwrap();
        assert_eq!(units["m"].label, "mètre");
    }

    #[test]
    fn missing_label_column_is_an_error() {
        let text = "UCUM_symbol\tSI_symbol\tlabel_en\tdefinition_en\nm\tm\tmetre\t\n";
        let err = parse_units(text, b'\t', "de").unwrap_err();
        assert!(matches!(err, Error::Table(_)));
    }

    #[test]
    fn parses_prefixes_and_exponents() {
        let text = "symbol,label_en,prefix_num\nk,kilo,3\nm,milli,-3\n";
        let prefixes = parse_prefixes(text, b',', "en").unwrap();
        assert_eq!(prefixes["m"], PrefixInfo::new("milli", -3));
        let exponents = parse_exponents("power\tlabel_en\n2\tsquare\n", b'\t', "en").unwrap();
        assert_eq!(exponents[&2], "square");
    }

    #[test]
    fn mapping_rows_accumulate_per_iri() {
        let text = "IRI\tUCUM\n\
                    http://qudt.org/vocab/unit/M-PER-SEC\tm.s-1\n\
                    http://qudt.org/vocab/unit/M-PER-SEC\tm/s\n";
        let mappings = parse_mappings(text, b'\t').unwrap();
        assert_eq!(
            mappings.codes("http://qudt.org/vocab/unit/M-PER-SEC"),
            Some(&["m.s-1".to_string(), "m/s".to_string()][..])
        );
    }

    #[test]
    fn delimiter_follows_extension() {
        assert_eq!(delimiter_for(Path::new("units.csv")), b',');
        assert_eq!(delimiter_for(Path::new("units.tsv")), b'\t');
        assert_eq!(delimiter_for(Path::new("units")), b'\t');
    }
}

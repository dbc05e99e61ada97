//! `uom`: generate a linked-data vocabulary from a list of UCUM unit codes.
//!
//! Usage:
//!   uom codes.tsv -f ttl > units.ttl
//!   printf 'm/s\nkg.m2/s2\n' | uom --no-strict -f json-ld

mod logging;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use uom_graph::{Format, GraphConfig, DEFAULT_BASE_IRI};
use uom_ucum::{
    builtin_tables, convert, loader, ConvertOptions, LookupTables, LookupTablesBuilder,
    BUILTIN_LANG,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ttl,
    Nt,
    JsonLd,
    Xml,
    Html,
    /// The canonical records themselves, without a graph.
    Json,
}

impl OutputFormat {
    fn graph_format(self) -> Option<Format> {
        match self {
            OutputFormat::Ttl => Some(Format::Turtle),
            OutputFormat::Nt => Some(Format::NTriples),
            OutputFormat::JsonLd => Some(Format::JsonLd),
            OutputFormat::Xml => Some(Format::RdfXml),
            OutputFormat::Html => Some(Format::Html),
            OutputFormat::Json => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "uom", version)]
#[command(about = "Convert UCUM unit codes into a linked-data vocabulary")]
struct Args {
    /// File of UCUM codes, one per row in the first column (reads stdin when omitted or '-')
    input: Option<PathBuf>,

    /// Unit table (UCUM_symbol, SI_symbol, label_<lang>, definition_<lang>, ...)
    #[arg(short = 's', long = "si", value_name = "FILE")]
    units: Option<PathBuf>,

    /// SI prefix table (symbol, label_<lang>, prefix_num)
    #[arg(short, long, value_name = "FILE")]
    prefixes: Option<PathBuf>,

    /// Exponent label table (power, label_<lang>)
    #[arg(short, long, value_name = "FILE")]
    exponents: Option<PathBuf>,

    /// Ontology term to UCUM code mappings (IRI, UCUM); may be repeated
    #[arg(short, long, value_name = "FILE")]
    mappings: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ttl)]
    format: OutputFormat,

    /// Language for labels, definitions and synonyms
    #[arg(short, long, env = "UOM_LANG", default_value = BUILTIN_LANG)]
    lang: String,

    /// Exclude ontology mappings
    #[arg(short = 'x', long)]
    exclude_mappings: bool,

    /// Base IRI for minted unit identifiers
    #[arg(short, long, env = "UOM_BASE_IRI", default_value = DEFAULT_BASE_IRI)]
    base_iri: String,

    /// Skip unparseable unit codes instead of failing
    #[arg(long)]
    no_strict: bool,

    /// Do not match mappings against reordered term codes
    #[arg(long)]
    no_permutations: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log conversion details
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            strict: !self.no_strict,
            match_permutations: !self.no_permutations,
            ..ConvertOptions::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let inputs = read_inputs(args.input.as_deref())?;
    info!(codes = inputs.len(), "read unit codes");

    let tables = load_tables(&args)?;
    let records = convert(&inputs, &tables, &args.convert_options())
        .context("failed to convert unit codes")?;
    info!(
        converted = records.len(),
        skipped = inputs.len() - records.len(),
        "converted unit codes"
    );

    let output = match args.format.graph_format() {
        Some(format) => {
            let config = GraphConfig::new(args.base_iri.clone());
            uom_graph::render(&records, &config, format)
                .with_context(|| format!("failed to write {format} output"))?
        }
        None => serde_json::to_string_pretty(&records).context("failed to write JSON output")?,
    };

    match &args.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn read_inputs(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) if path != Path::new("-") => loader::load_codes(path)
            .with_context(|| format!("failed to read unit codes from {}", path.display())),
        _ => read_lines(io::stdin().lock()).context("failed to read unit codes from stdin"),
    }
}

/// Trimmed, non-blank lines.
fn read_lines(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut codes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let code = line.trim();
        if !code.is_empty() {
            codes.push(code.to_string());
        }
    }
    Ok(codes)
}

/// Built-in tables for the built-in language, replaced table by table with
/// any supplied files.
fn load_tables(args: &Args) -> Result<LookupTables> {
    let lang = args.lang.as_str();
    let mut builder = if lang == BUILTIN_LANG {
        builtin_tables()
    } else {
        if args.units.is_none() || args.prefixes.is_none() {
            bail!("language '{lang}' has no built-in tables; supply --si and --prefixes");
        }
        if args.exponents.is_none() {
            warn!(lang, "no exponent labels for this language");
        }
        LookupTablesBuilder::new(lang)
    };

    if let Some(path) = &args.units {
        let units = loader::load_units(path, lang)
            .with_context(|| format!("failed to load unit table {}", path.display()))?;
        info!(path = %path.display(), units = units.len(), "loaded unit table");
        builder = builder.units(units);
    }
    if let Some(path) = &args.prefixes {
        let prefixes = loader::load_prefixes(path, lang)
            .with_context(|| format!("failed to load prefix table {}", path.display()))?;
        builder = builder.prefixes(prefixes);
    }
    if let Some(path) = &args.exponents {
        let exponents = loader::load_exponents(path, lang)
            .with_context(|| format!("failed to load exponent table {}", path.display()))?;
        builder = builder.exponents(exponents);
    }

    if args.exclude_mappings {
        builder = builder.without_mappings();
    } else {
        for path in &args.mappings {
            let mappings = loader::load_mappings(path)
                .with_context(|| format!("failed to load mappings {}", path.display()))?;
            info!(path = %path.display(), iris = mappings.len(), "loaded ontology mappings");
            builder = builder.extend_mappings(mappings);
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_turtle() {
        let args = Args::try_parse_from(["uom"]).unwrap();
        assert_eq!(args.format, OutputFormat::Ttl);
        assert!(args.convert_options().strict);
        assert!(args.convert_options().match_permutations);
        assert_eq!(args.lang, "en");
        assert_eq!(args.base_iri, DEFAULT_BASE_IRI);
    }

    #[test]
    fn parses_short_flags() {
        let args = Args::try_parse_from([
            "uom", "codes.csv", "-s", "units.tsv", "-m", "a.tsv", "-m", "b.tsv", "-f", "json-ld",
            "-x", "--no-strict",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("codes.csv")));
        assert_eq!(args.units.as_deref(), Some(Path::new("units.tsv")));
        assert_eq!(args.mappings.len(), 2);
        assert_eq!(args.format, OutputFormat::JsonLd);
        assert!(args.exclude_mappings);
        assert!(!args.convert_options().strict);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Args::try_parse_from(["uom", "-f", "yaml"]).is_err());
    }

    #[test]
    fn stdin_lines_are_trimmed() {
        let codes = read_lines(" m/s \n\n\tkg\n".as_bytes()).unwrap();
        assert_eq!(codes, vec!["m/s", "kg"]);
    }

    #[test]
    fn other_languages_need_tables() {
        let args = Args::try_parse_from(["uom", "-l", "fr"]).unwrap();
        assert!(load_tables(&args).is_err());
    }

    #[test]
    fn builtin_tables_load_for_english() {
        let args = Args::try_parse_from(["uom"]).unwrap();
        let tables = load_tables(&args).unwrap();
        assert_eq!(tables.lang(), "en");
        assert!(tables.unit("m").is_some());
    }
}

use uom_ucum::{
    builtin_tables, convert, convert_one, symbols, ConvertOptions, Error, LookupTables, UnitInfo,
    KG_DEFINITION_EN, MAX_PERMUTATION_TERMS,
};

fn builtin() -> LookupTables {
    builtin_tables().build()
}

fn canonical(tables: &LookupTables, input: &str) -> String {
    convert_one(input, tables, &ConvertOptions::strict())
        .unwrap_or_else(|err| panic!("{input}: {err}"))
        .canonical_code
}

#[test]
fn minimal_tables_end_to_end() {
    let tables = LookupTables::builder("en")
        .unit(
            "m",
            UnitInfo::new("metre")
                .with_symbol("m")
                .with_definition("The SI base unit of length."),
        )
        .unit(
            "s",
            UnitInfo::new("second")
                .with_symbol("s")
                .with_definition("The SI base unit of time."),
        )
        .build();

    let records = convert(["m.s-1"], &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.canonical_code, "m.s-1");
    assert_eq!(record.label, "metre per second");
    assert_eq!(record.symbol_code.as_deref(), Some("m s-1"));
}

#[test]
fn equivalent_spellings_share_canonical_code() {
    let tables = builtin();
    assert_eq!(canonical(&tables, "m/s"), "m.s-1");
    assert_eq!(canonical(&tables, "s-1.m"), "m.s-1");
    assert_eq!(canonical(&tables, "/s.m-1"), "m.s-1");
    assert_eq!(canonical(&tables, "kg.m2/s2"), canonical(&tables, "s-2.m2.kg"));
}

#[test]
fn canonical_codes_are_stable() {
    let tables = builtin();
    for input in ["m/s", "kg.m2/s2", "/s", "mL/min", "[ft_i]/s", "mol/L", "har"] {
        let first = canonical(&tables, input);
        assert_eq!(canonical(&tables, &first), first, "re-canonicalizing {input}");
    }
}

#[test]
fn builtin_labels() {
    let tables = builtin();
    let options = ConvertOptions::strict();
    let label = |code: &str| convert_one(code, &tables, &options).unwrap().label;

    assert_eq!(label("kg.m2/s2"), "kilogram square metre per square second");
    assert_eq!(label("har"), "hectare");
    assert_eq!(label("daar"), "decare");
    assert_eq!(label("/s"), "reciprocal second");
    assert_eq!(label("Cel"), "degree Celsius");
}

#[test]
fn kilogram_definition() {
    let tables = builtin();
    let record = convert_one("kg", &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(record.definition.as_deref(), Some(KG_DEFINITION_EN));
}

#[test]
fn si_symbols_replace_ucum_symbols() {
    let tables = builtin();
    let record = convert_one("Ohm.m", &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(record.symbol_code.as_deref(), Some("m Ω"));

    let record = convert_one("Cel/h", &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(record.symbol_code.as_deref(), Some("°C h-1"));
}

#[test]
fn conventional_units_have_no_symbol_code() {
    let tables = builtin();
    for input in ["[ft_i]/s", "%", "m.[in_i]"] {
        let record = convert_one(input, &tables, &ConvertOptions::strict()).unwrap();
        assert_eq!(record.symbol_code, None, "{input}");
    }
}

#[test]
fn equivalent_codes_from_unit_table() {
    let tables = builtin();
    let record = convert_one("L/s", &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(record.equivalent_codes, vec!["l.s-1"]);
    assert_eq!(record.synonyms, vec!["liter per second"]);

    let record = convert_one("[IU]/L", &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(record.canonical_code, "[IU].L-1");
    assert_eq!(record.equivalent_codes, vec!["[iU].l-1"]);
}

#[test]
fn mapping_found_through_alternate_spelling() {
    let tables = builtin_tables()
        .mapping("http://qudt.org/vocab/unit/M-PER-SEC", "m.s-1")
        .build();
    let record = convert_one("m/s", &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(
        record.mapped_iris,
        vec!["http://qudt.org/vocab/unit/M-PER-SEC".to_string()]
    );
}

#[test]
fn strict_mode_names_the_bad_input() {
    let tables = builtin();
    let err = convert(["m", "not a unit", "s"], &tables, &ConvertOptions::strict()).unwrap_err();
    assert_eq!(err.input(), Some("not a unit"));
    assert!(err.to_string().contains("not a unit"));
}

#[test]
fn lenient_mode_continues_after_failures() {
    let tables = builtin();
    let records = convert(
        ["m", "not a unit", "m0", "s"],
        &tables,
        &ConvertOptions::default(),
    )
    .unwrap();
    let codes: Vec<_> = records.iter().map(|r| r.canonical_code.as_str()).collect();
    assert_eq!(codes, vec!["m", "s"]);
}

#[test]
fn validate_rejects_incomplete_expressions() {
    for input in ["kg.", "m/", "/", "µg", "m2-", ".s"] {
        assert!(uom_ucum::validate(input).is_err(), "{input}");
    }
    assert!(uom_ucum::validate("ug/kg").is_ok());
    assert!(uom_ucum::validate("m s").is_ok(), "whitespace is skipped, giving ms");
}

#[test]
fn prefixes_and_symbols_are_case_sensitive() {
    assert!(uom_ucum::validate("kg").is_ok());
    assert!(uom_ucum::validate("Kg").is_err());
    assert!(uom_ucum::validate("mA").is_ok());
    assert!(uom_ucum::validate("MA").is_ok());
    assert!(uom_ucum::validate("ma").is_err());
}

#[test]
fn zero_exponent_is_rejected() {
    let tables = builtin();
    let err = convert_one("m0", &tables, &ConvertOptions::strict()).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }));
}

#[test]
fn every_grammar_symbol_has_builtin_metadata() {
    let tables = builtin();
    for set in [
        &symbols::METRIC,
        &symbols::NON_PREFIXED_METRIC,
        &symbols::CONVENTIONAL,
        &symbols::CONVENTIONAL_BRACKETED,
        &symbols::CONVENTIONAL_MIXED_BRACKETED,
    ] {
        for symbol in set.iter() {
            let info = tables.unit(symbol);
            assert!(info.is_some(), "no built-in entry for {symbol}");
            assert!(info.is_some_and(|i| !i.label.is_empty()), "{symbol} has no label");
        }
    }
    for prefix in symbols::PREFIXES.iter() {
        assert!(tables.prefix(prefix).is_some(), "no built-in prefix {prefix}");
    }
}

#[test]
fn conventional_and_mixed_bracketed_units_convert() {
    let tables = builtin();
    let options = ConvertOptions::strict();
    let label = |code: &str| {
        convert_one(code, &tables, &options)
            .unwrap_or_else(|err| panic!("{code}: {err}"))
            .label
    };
    assert_eq!(label("g%"), "gram percent");
    assert_eq!(label("%[slope]"), "percent of slope");
    assert_eq!(label("B[10.nV]"), "bel 10 nanovolt");
    assert_eq!(label("[in_i'Hg]"), "inch of mercury column");

    let record = convert_one("B[10.nV]/s", &tables, &options).unwrap();
    assert_eq!(record.canonical_code, "B[10.nV].s-1");
    assert_eq!(record.alternate_code, "B[10.nV]/s");
}

#[test]
fn leading_slash_negates_every_term() {
    let tables = builtin_tables()
        .mapping("http://example.org/unit/per-second-per-metre", "s-1.m-1")
        .build();
    let record = convert_one("/m/s", &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(record.canonical_code, "m-1.s-1");
    assert_eq!(record.alternate_code, "/m/s");
    assert_eq!(
        record.mapped_iris,
        vec!["http://example.org/unit/per-second-per-metre".to_string()]
    );

    let options = ConvertOptions {
        match_permutations: false,
        ..ConvertOptions::strict()
    };
    let record = convert_one("/m/s", &tables, &options).unwrap();
    assert!(record.mapped_iris.is_empty());
}

#[test]
fn term_order_matching_is_capped() {
    let six = "m.s.g.K.A.cd";
    let seven = "m.s.g.K.A.cd.mol";
    assert_eq!(six.split('.').count(), MAX_PERMUTATION_TERMS);

    let tables = builtin_tables()
        .mapping("http://example.org/six", "s.m.g.K.A.cd")
        .mapping("http://example.org/seven-reordered", "s.m.g.K.A.cd.mol")
        .mapping("http://example.org/seven-as-written", seven)
        .build();
    let options = ConvertOptions::strict();

    let record = convert_one(six, &tables, &options).unwrap();
    assert_eq!(record.mapped_iris, vec!["http://example.org/six".to_string()]);

    let record = convert_one(seven, &tables, &options).unwrap();
    assert_eq!(
        record.mapped_iris,
        vec!["http://example.org/seven-as-written".to_string()]
    );
}

#[test]
fn expansion_limit_applies_to_batches() {
    let tables = builtin_tables()
        .unit(
            "m",
            UnitInfo::new("metre")
                .with_symbol("m")
                .with_synonyms(["meter", "mètre", "metro", "metr"]),
        )
        .build();
    let strict = ConvertOptions {
        max_expansion: 10,
        ..ConvertOptions::strict()
    };

    let err = convert(["m", "m.m2"], &tables, &strict).unwrap_err();
    assert!(matches!(err, Error::Structural { .. }), "{err}");
    assert_eq!(err.input(), Some("m.m2"));

    let lenient = ConvertOptions {
        strict: false,
        ..strict
    };
    let records = convert(["m", "m.m2", "s"], &tables, &lenient).unwrap();
    let codes: Vec<_> = records.iter().map(|r| r.canonical_code.as_str()).collect();
    assert_eq!(codes, vec!["m", "s"]);
}

#[test]
fn denominator_factor_does_not_round_trip() {
    let tables = builtin();
    let record = convert_one("[ft_i]/12", &tables, &ConvertOptions::strict()).unwrap();
    assert_eq!(record.canonical_code, "[ft_i].12-1");
    assert_eq!(record.alternate_code, "[ft_i]/12");

    let err = convert_one(&record.canonical_code, &tables, &ConvertOptions::strict()).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
    assert_eq!(
        canonical(&tables, &record.alternate_code),
        record.canonical_code
    );
}

mod tip_fixtures;

use calamine::Data;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use tip_fixtures::{
    matchup_scenario, read_output, tips_workbook, tips_workbook_with_headers,
    tips_workbook_with_time_column, xlsx_part, Tip, HEADERS,
};
use tipmanager::cache::ReportCache;
use tipmanager::importers::{parse_tips_workbook, TipOptions};
use tipmanager::reports::GroupValue;
use tipmanager::{
    run_pipeline, ColorHints, FailureKind, FilterParams, Pipeline, Rgb, Selection, TipsError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn params() -> FilterParams {
    FilterParams {
        tournament: Selection::All,
        tip: Selection::All,
        winrate_min: Decimal::ZERO,
        winrate_max: Decimal::ONE,
        date_start: date(2024, 1, 1),
        date_end: date(2024, 12, 31),
    }
}

const SHEETS: [&str; 8] = [
    "Tips Enviadas",
    "Campeonato",
    "Confronto",
    "Winrate 1",
    "Winrate 2",
    "Jogador",
    "ROI por Time",
    "Confronto Times",
];

#[test]
fn winrate_filter_keeps_first_matchup_row() {
    let bytes = tips_workbook(&matchup_scenario());
    let mut p = params();
    p.winrate_min = dec!(0.5);

    let output = run_pipeline(&bytes, &p, &ColorHints::default()).unwrap();

    assert_eq!(output.tips.len(), 1);
    assert_eq!(output.tips[0].row.profit, dec!(10));
    assert_eq!(output.tips[0].matchup, "X vs Y");

    let rows = &output.reports.by_matchup.rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tournament, "A");
    assert_eq!(rows[0].key, GroupValue::Text("X vs Y".into()));
    assert_eq!(rows[0].count, 1);
    assert_eq!(rows[0].profit_sum, dec!(10));
    assert_eq!(rows[0].roi, dec!(10));

    assert_eq!(output.summary.total_entries, 1);
    assert_eq!(output.summary.average_roi_pct, dec!(1000));
}

#[test]
fn mirrored_matchups_share_one_group() {
    let bytes = tips_workbook(&matchup_scenario());
    let output = run_pipeline(&bytes, &params(), &ColorHints::default()).unwrap();

    let rows = &output.reports.by_matchup.rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].profit_sum, dec!(5));
    assert_eq!(rows[0].roi, dec!(2.5));

    // Each player appears once per tip
    assert_eq!(output.reports.by_player.total_count(), 4);
    assert_eq!(output.reports.by_team_matchup.rows, output.reports.by_matchup.rows);
}

#[test]
fn inverted_winrate_bounds_are_a_validation_error() {
    let bytes = tips_workbook(&matchup_scenario());
    let mut p = params();
    p.winrate_min = dec!(0.8);
    p.winrate_max = dec!(0.2);

    let err = run_pipeline(&bytes, &p, &ColorHints::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TipsError>(),
        Some(TipsError::Validation(_))
    ));
    assert_eq!(TipsError::classify(&err), FailureKind::Error);
}

#[test]
fn no_matching_rows_is_a_warning() {
    let bytes = tips_workbook(&matchup_scenario());
    let mut p = params();
    p.tournament = Selection::parse("Inexistente");

    let err = run_pipeline(&bytes, &p, &ColorHints::default()).unwrap_err();
    assert_eq!(TipsError::classify(&err), FailureKind::Warning);
    assert_eq!(err.to_string(), "Nenhum dado disponível após o filtro.");
}

#[test]
fn missing_required_column_is_named() {
    let headers: Vec<&str> = HEADERS.iter().copied().filter(|h| *h != "Campeonato").collect();
    let bytes = tips_workbook_with_headers(&headers, &matchup_scenario());

    let err = parse_tips_workbook(&bytes).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TipsError>(),
        Some(TipsError::Schema(_))
    ));
    assert!(format!("{:#}", err).contains("Campeonato"));
}

#[test]
fn date_and_tip_filters_are_inclusive_and_case_insensitive() {
    let tips = vec![
        Tip::new("A", "X", "Y").tip("over 2.5").date(2024, 3, 1),
        Tip::new("A", "X", "Z").tip("OVER 2.5").date(2024, 3, 31),
        Tip::new("A", "X", "W").tip("Over 2.5").date(2024, 4, 1),
        Tip::new("A", "X", "V").tip("Under").date(2024, 3, 15),
    ];
    let bytes = tips_workbook(&tips);
    let mut p = params();
    p.tip = Selection::parse("Over 2.5");
    p.date_start = date(2024, 3, 1);
    p.date_end = date(2024, 3, 31);

    let output = run_pipeline(&bytes, &p, &ColorHints::default()).unwrap();
    assert_eq!(output.tips.len(), 2);
}

#[test]
fn workbook_has_eight_sheets_in_order() {
    let bytes = tips_workbook(&matchup_scenario());
    let output = run_pipeline(&bytes, &params(), &ColorHints::default()).unwrap();

    let (names, ranges) = read_output(&output.workbook);
    assert_eq!(names, SHEETS.map(String::from).to_vec());

    // Raw sheet: source columns plus the two derived ones
    let raw = &ranges[0];
    assert_eq!(raw.height(), 3);
    assert_eq!(raw.width(), HEADERS.len() + 2);
    assert_eq!(
        raw.get_value((0, 12)),
        Some(&Data::String("Data".into()))
    );
    assert_eq!(
        raw.get_value((0, 13)),
        Some(&Data::String("Confronto Normalizado".into()))
    );
    assert!(matches!(raw.get_value((1, 12)), Some(Data::DateTime(_))));
    assert_eq!(raw.get_value((2, 13)), Some(&Data::String("X vs Y".into())));

    // Grouped sheets: Torneio, dimension, count, profit, ROI
    let confronto = &ranges[2];
    assert_eq!(confronto.width(), 5);
    assert_eq!(
        confronto.get_value((0, 2)),
        Some(&Data::String("Quantidade_Entradas".into()))
    );
    assert_eq!(confronto.get_value((1, 2)), Some(&Data::Float(2.0)));
    assert_eq!(confronto.get_value((1, 4)), Some(&Data::Float(2.5)));

    let team = &ranges[6];
    assert_eq!(team.get_value((0, 1)), Some(&Data::String("Time".into())));
}

#[test]
fn profit_cells_are_rounded_and_coloured() {
    let tips = vec![
        Tip::new("A", "X", "Y").profit(7.555),
        Tip::new("B", "X", "Y").profit(-3.2),
    ];
    let bytes = tips_workbook(&tips);
    let output = run_pipeline(&bytes, &params(), &ColorHints::default()).unwrap();

    let (_, ranges) = read_output(&output.workbook);
    let raw = &ranges[0];
    assert_eq!(raw.get_value((1, 8)), Some(&Data::Float(7.56)));
    assert_eq!(raw.get_value((2, 8)), Some(&Data::Float(-3.2)));

    let styles = xlsx_part(&output.workbook, "xl/styles.xml");
    assert!(styles.contains("FFC6EFCE"), "light green fill");
    assert!(styles.contains("FF006400"), "dark green font");
    assert!(styles.contains("FFFFC7CE"), "light red fill");
    assert!(styles.contains("FF8B0000"), "dark red font");
    assert!(styles.contains("FFB2B2B2"), "gray header fill");
    assert!(styles.contains("0.00%"));
}

#[test]
fn color_hints_replace_fill_only() {
    let bytes = tips_workbook(&matchup_scenario());
    let hints = ColorHints {
        positive: Some(Rgb(0x90EE90)),
        negative: None,
    };
    let output = run_pipeline(&bytes, &params(), &hints).unwrap();

    let styles = xlsx_part(&output.workbook, "xl/styles.xml");
    assert!(styles.contains("FF90EE90"));
    assert!(!styles.contains("FFC6EFCE"));
    assert!(styles.contains("FF006400"));
    assert!(styles.contains("FFFFC7CE"));
}

#[test]
fn every_sheet_carries_a_named_table() {
    let bytes = tips_workbook(&matchup_scenario());
    let output = run_pipeline(&bytes, &params(), &ColorHints::default()).unwrap();

    let tables: String = (1..=SHEETS.len())
        .map(|i| xlsx_part(&output.workbook, &format!("xl/tables/table{}.xml", i)))
        .collect();
    for sheet in SHEETS {
        let name = format!("Table_{}", sheet.replace(' ', "_"));
        assert!(tables.contains(&format!("name=\"{}\"", name)), "missing {}", name);
    }
    assert!(tables.contains("TableStyleLight1"));
    assert!(tables.contains("showRowStripes=\"1\""));
}

#[test]
fn time_of_day_column_is_written_back() {
    let bytes = tips_workbook_with_time_column(&matchup_scenario(), "Hora", 0.75);
    let output = run_pipeline(&bytes, &params(), &ColorHints::default()).unwrap();

    let (_, ranges) = read_output(&output.workbook);
    let raw = &ranges[0];
    assert_eq!(raw.get_value((0, 12)), Some(&Data::String("Hora".into())));
    match raw.get_value((1, 12)) {
        Some(Data::DateTime(t)) => assert_eq!(t.as_f64(), 0.75),
        other => panic!("expected a time cell, got {:?}", other),
    }
    assert_eq!(raw.get_value((0, 13)), Some(&Data::String("Data".into())));
}

#[test]
fn dates_before_1900_are_written_as_text() {
    let tips = vec![Tip::new("A", "X", "Y").date_text("01/01/1899")];
    let bytes = tips_workbook(&tips);
    let mut p = params();
    p.date_start = date(1800, 1, 1);

    let output = run_pipeline(&bytes, &p, &ColorHints::default()).unwrap();
    assert_eq!(output.tips.len(), 1);

    let (_, ranges) = read_output(&output.workbook);
    assert_eq!(
        ranges[0].get_value((1, 12)),
        Some(&Data::String("1899-01-01".into()))
    );
}

#[test]
fn zero_profit_is_uncoloured() {
    let tips = vec![Tip::new("A", "X", "Y").profit(0.0)];
    let output = run_pipeline(&tips_workbook(&tips), &params(), &ColorHints::default()).unwrap();

    let styles = xlsx_part(&output.workbook, "xl/styles.xml");
    assert!(!styles.contains("FFC6EFCE"));
    assert!(!styles.contains("FFFFC7CE"));
}

#[test]
fn rendering_is_deterministic() {
    let bytes = tips_workbook(&matchup_scenario());
    let a = run_pipeline(&bytes, &params(), &ColorHints::default()).unwrap();
    let b = run_pipeline(&bytes, &params(), &ColorHints::default()).unwrap();
    assert_eq!(a.workbook, b.workbook);
}

#[test]
fn pipeline_cache_reuses_identical_runs() {
    let bytes = tips_workbook(&matchup_scenario());
    let mut pipeline = Pipeline::new(ReportCache::new(2).unwrap());

    let first = pipeline.run(&bytes, &params(), &ColorHints::default()).unwrap();
    let again = pipeline.run(&bytes, &params(), &ColorHints::default()).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let mut narrower = params();
    narrower.winrate_min = dec!(0.5);
    let other = pipeline.run(&bytes, &narrower, &ColorHints::default()).unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(pipeline.cache().len(), 2);
}

#[test]
fn failed_runs_are_not_cached() {
    let bytes = tips_workbook(&matchup_scenario());
    let mut pipeline = Pipeline::default();
    let mut p = params();
    p.tournament = Selection::parse("Inexistente");

    assert!(pipeline.run(&bytes, &p, &ColorHints::default()).is_err());
    assert!(pipeline.cache().is_empty());
}

#[test]
fn options_are_discovered_from_the_sheet() {
    let tips = vec![
        Tip::new("B", "X", "Y").tip("ml").date(2024, 2, 1),
        Tip::new("A", "X", "Y").tip("Over").date(2024, 1, 15),
        Tip::new("B", "X", "Y").tip("ML").date(2024, 3, 1),
    ];
    let sheet = parse_tips_workbook(&tips_workbook(&tips)).unwrap();
    let options = TipOptions::discover(&sheet);

    assert_eq!(options.tournaments, vec!["Todos", "B", "A"]);
    assert_eq!(options.tips, vec!["Todos", "ML", "OVER"]);
    assert_eq!(options.earliest_date, date(2024, 1, 15));
    assert_eq!(options.default_winrate_min, Decimal::ZERO);
}

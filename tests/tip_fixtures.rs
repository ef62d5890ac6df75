#![allow(dead_code)]

//! In-memory TipManager exports for integration tests.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

pub const HEADERS: [&str; 12] = [
    "Torneio",
    "Tip",
    "Jogador A",
    "Jogador B",
    "Time A",
    "Time B",
    "Winrate 1",
    "Winrate 2",
    "Lucro/Prej.",
    "Liquidação",
    "Campeonato",
    "Resultado",
];

/// One row of the "Tips Enviadas" sheet
#[derive(Debug, Clone)]
pub struct Tip {
    pub tournament: &'static str,
    pub tip: &'static str,
    pub player_a: Option<&'static str>,
    pub player_b: Option<&'static str>,
    pub team_a: Option<&'static str>,
    pub team_b: Option<&'static str>,
    pub winrate_1: Option<f64>,
    pub winrate_2: Option<f64>,
    pub profit: Option<f64>,
    /// (year, month, day)
    pub date: Option<(u16, u8, u8)>,
    /// Written as text instead of a date cell when set
    pub date_text: Option<&'static str>,
    pub championship: &'static str,
    pub result: Option<&'static str>,
}

impl Tip {
    pub fn new(tournament: &'static str, a: &'static str, b: &'static str) -> Self {
        Self {
            tournament,
            tip: "ML",
            player_a: Some(a),
            player_b: Some(b),
            team_a: Some("Alpha"),
            team_b: Some("Beta"),
            winrate_1: Some(0.6),
            winrate_2: Some(0.55),
            profit: Some(1.0),
            date: Some((2024, 1, 1)),
            date_text: None,
            championship: "Série A",
            result: None,
        }
    }

    pub fn winrate(mut self, w: f64) -> Self {
        self.winrate_1 = Some(w);
        self
    }

    pub fn profit(mut self, p: f64) -> Self {
        self.profit = Some(p);
        self
    }

    pub fn date(mut self, y: u16, m: u8, d: u8) -> Self {
        self.date = Some((y, m, d));
        self
    }

    pub fn date_text(mut self, text: &'static str) -> Self {
        self.date = None;
        self.date_text = Some(text);
        self
    }

    pub fn tip(mut self, tip: &'static str) -> Self {
        self.tip = tip;
        self
    }

    pub fn result(mut self, r: &'static str) -> Self {
        self.result = Some(r);
        self
    }
}

/// The two-row matchup scenario: X vs Y won at 0.6, Y vs X lost at 0.4
pub fn matchup_scenario() -> Vec<Tip> {
    vec![
        Tip::new("A", "X", "Y")
            .winrate(0.6)
            .profit(10.0)
            .date(2024, 1, 1)
            .result("Green"),
        Tip::new("A", "Y", "X")
            .winrate(0.4)
            .profit(-5.0)
            .date(2024, 1, 2)
            .result("Red"),
    ]
}

/// Build an xlsx with a "Tips Enviadas" sheet holding `tips`
pub fn tips_workbook(tips: &[Tip]) -> Vec<u8> {
    tips_workbook_with_headers(&HEADERS, tips)
}

pub fn tips_workbook_with_headers(headers: &[&str], tips: &[Tip]) -> Vec<u8> {
    build_workbook(headers, tips, None)
}

/// Standard columns plus a trailing time-of-day column formatted `hh:mm`
pub fn tips_workbook_with_time_column(tips: &[Tip], header: &str, serial: f64) -> Vec<u8> {
    build_workbook(&HEADERS, tips, Some((header, serial)))
}

fn build_workbook(headers: &[&str], tips: &[Tip], time_column: Option<(&str, f64)>) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let time_format = Format::new().set_num_format("hh:mm");
    let time_col = headers.len() as u16;
    let sheet = workbook.add_worksheet();
    sheet.set_name("Tips Enviadas").unwrap();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    if let Some((header, _)) = time_column {
        sheet.write_string(0, time_col, header).unwrap();
    }

    for (idx, tip) in tips.iter().enumerate() {
        let row = (idx + 1) as u32;
        let text = [
            (0, Some(tip.tournament)),
            (1, Some(tip.tip)),
            (2, tip.player_a),
            (3, tip.player_b),
            (4, tip.team_a),
            (5, tip.team_b),
            (10, Some(tip.championship)),
            (11, tip.result),
        ];
        for (col, value) in text {
            if let Some(v) = value {
                if (col as usize) < headers.len() {
                    sheet.write_string(row, col, v).unwrap();
                }
            }
        }
        for (col, value) in [(6, tip.winrate_1), (7, tip.winrate_2), (8, tip.profit)] {
            if let Some(v) = value {
                sheet.write_number(row, col, v).unwrap();
            }
        }
        if let Some((y, m, d)) = tip.date {
            let date = ExcelDateTime::from_ymd(y, m, d).unwrap();
            sheet
                .write_datetime_with_format(row, 9, &date, &date_format)
                .unwrap();
        }
        if let Some(text) = tip.date_text {
            sheet.write_string(row, 9, text).unwrap();
        }
        if let Some((_, serial)) = time_column {
            sheet
                .write_number_with_format(row, time_col, serial, &time_format)
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

pub fn write_fixture(dir: &Path, name: &str, tips: &[Tip]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, tips_workbook(tips)).unwrap();
    path
}

/// Sheet names and ranges of a rendered workbook
pub fn read_output(bytes: &[u8]) -> (Vec<String>, Vec<Range<Data>>) {
    let mut wb = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).unwrap();
    let names = wb.sheet_names();
    let ranges = names
        .iter()
        .map(|n| wb.worksheet_range(n).unwrap())
        .collect();
    (names, ranges)
}

/// Raw XML part of an xlsx, for checks calamine cannot see (styles, tables)
pub fn xlsx_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

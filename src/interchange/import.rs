use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use super::{Format, InterchangeError, Result};
use crate::storage::decode_records;
use crate::vocab::{RawCard, RawSchedulingState};

/// Read a JSON or CSV file, choosing the parser from its extension.
///
/// `now` stamps CSV rows that carry no timestamps.
pub fn import_file(path: &Path, now: DateTime<Utc>) -> Result<Vec<RawCard>> {
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path)?;
    let records = parse_records(&content, format, now)?;
    log::info!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

pub fn parse_records(content: &str, format: Format, now: DateTime<Utc>) -> Result<Vec<RawCard>> {
    match format {
        Format::Json => parse_json(content),
        Format::Csv => parse_csv(content, now),
    }
}

/// Parse an export envelope `{"words": [...]}` or a bare array of records
pub fn parse_json(content: &str) -> Result<Vec<RawCard>> {
    let value: serde_json::Value = serde_json::from_str(strip_bom(content))?;
    decode_records(value).ok_or_else(|| {
        InterchangeError::InvalidDocument("expected a \"words\" array or an array of cards".to_string())
    })
}

/// Parse a CSV document with a header row.
///
/// Columns are matched by header name, so order does not matter and unknown
/// columns are ignored. Unparseable rows are skipped. A row without
/// `createdAt` or `updatedAt` is stamped with `now`, so a hand-written row
/// counts as a fresh edit when merged.
pub fn parse_csv(content: &str, now: DateTime<Utc>) -> Result<Vec<RawCard>> {
    let stamp = now.to_rfc3339_opts(SecondsFormat::AutoSi, true);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(strip_bom(content).as_bytes());

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (canonical_column(h.trim()), i))
        .collect();

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping CSV row {}: {}", row_idx + 1, e);
                continue;
            }
        };

        let text = |name: &str| -> Option<String> {
            columns
                .get(name)
                .and_then(|&i| row.get(i))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let number = |name: &str| -> Option<f64> { text(name).and_then(|v| v.trim().parse().ok()) };

        records.push(RawCard {
            id: text("id"),
            hanzi: text("hanzi"),
            pinyin: text("pinyin"),
            meaning: text("meaning"),
            part_of_speech: text("partOfSpeech"),
            example: text("example"),
            chapter: text("chapter"),
            created_at: text("createdAt").or_else(|| Some(stamp.clone())),
            updated_at: text("updatedAt").or_else(|| Some(stamp.clone())),
            srs: Some(RawSchedulingState {
                interval: number("interval"),
                ease: number("ease"),
                due: text("due"),
                reps: number("reps"),
            }),
            ..Default::default()
        });
    }

    Ok(records)
}

fn canonical_column(header: &str) -> String {
    match header {
        "pos" => "partOfSpeech".to_string(),
        other => other.to_string(),
    }
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::{Format, Result};
use crate::vocab::VocabCard;

/// Column order of the tabular format
pub const CSV_HEADER: [&str; 13] = [
    "id",
    "hanzi",
    "pinyin",
    "meaning",
    "partOfSpeech",
    "example",
    "chapter",
    "createdAt",
    "updatedAt",
    "interval",
    "ease",
    "due",
    "reps",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    export_at: DateTime<Utc>,
    words: &'a [VocabCard],
}

/// Export cards in the given format
pub fn export_cards(cards: &[VocabCard], format: Format, now: DateTime<Utc>) -> Result<String> {
    match format {
        Format::Json => export_json(cards, now),
        Format::Csv => export_csv(cards),
    }
}

/// Export cards as `{"exportAt": ..., "words": [...]}`
pub fn export_json(cards: &[VocabCard], now: DateTime<Utc>) -> Result<String> {
    let export = JsonExport {
        export_at: now,
        words: cards,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Export cards as CSV with a header row.
///
/// Fields containing a comma, quote or newline are quoted with inner quotes
/// doubled.
pub fn export_csv(cards: &[VocabCard]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for card in cards {
        writer.write_record([
            card.id.as_str(),
            card.hanzi.as_str(),
            card.pinyin.as_str(),
            card.meaning.as_str(),
            card.part_of_speech.as_str(),
            card.example.as_str(),
            card.chapter.as_str(),
            iso(card.created_at).as_str(),
            iso(card.updated_at).as_str(),
            card.srs.interval.to_string().as_str(),
            card.srs.ease.to_string().as_str(),
            iso(card.srs.due).as_str(),
            card.srs.reps.to_string().as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

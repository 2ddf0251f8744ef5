use anyhow::{Context, Result};

use cidian_lib::vocab::{CardDraft, VocabCard};

use crate::app::{short_id, App};
use crate::render::terminal::{paint, Color};
use crate::{CardFields, OutputFormat};

pub fn run_add(
    app: &mut App,
    hanzi: String,
    meaning: String,
    fields: CardFields,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mut draft = CardDraft::new(hanzi, meaning);
    apply_fields(&mut draft, fields);

    let card = app.store.upsert(draft).context("Failed to add card")?;
    print_card("Added", &card, format, use_color)
}

pub fn run_edit(
    app: &mut App,
    id: &str,
    hanzi: Option<String>,
    meaning: Option<String>,
    fields: CardFields,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let existing = app.find_card(id)?;

    let mut draft = CardDraft::from_card(&existing);
    if let Some(hanzi) = hanzi {
        draft.hanzi = hanzi;
    }
    if let Some(meaning) = meaning {
        draft.meaning = meaning;
    }
    apply_fields(&mut draft, fields);

    let card = app.store.upsert(draft).context("Failed to update card")?;
    print_card("Updated", &card, format, use_color)
}

fn apply_fields(draft: &mut CardDraft, fields: CardFields) {
    if let Some(pinyin) = fields.pinyin {
        draft.pinyin = pinyin;
    }
    if let Some(pos) = fields.pos {
        draft.part_of_speech = pos;
    }
    if let Some(example) = fields.example {
        draft.example = example;
    }
    if let Some(chapter) = fields.chapter {
        draft.chapter = chapter;
    }
}

fn print_card(verb: &str, card: &VocabCard, format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(card)?);
        }
        OutputFormat::Plain => {
            println!("{} {} ({})", verb, paint(&card.hanzi, Color::BOLD, use_color), card.meaning);
            if !card.pinyin.is_empty() {
                println!("  Pinyin: {}", card.pinyin);
            }
            if !card.part_of_speech.is_empty() {
                println!("  POS: {}", card.part_of_speech);
            }
            if !card.chapter.is_empty() {
                println!("  Chapter: {}", card.chapter);
            }
            println!("  ID: {}", paint(short_id(&card.id), Color::GRAY, use_color));
        }
    }
    Ok(())
}

use anyhow::Result;

use cidian_lib::vocab::deck::{chapters, parts_of_speech};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.store.stats();
    let pos = parts_of_speech(app.store.cards());
    let chapters = chapters(app.store.cards());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "stats": stats,
                "partsOfSpeech": pos,
                "chapters": chapters,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let due = stats.due_cards.to_string();
            println!("Total     {}", stats.total_cards);
            println!("Due       {}", paint(&due, Color::YELLOW, use_color && stats.due_cards > 0));
            println!("New       {}", stats.new_cards);
            println!("Learning  {}", stats.learning_cards);
            println!("Review    {}", stats.review_cards);
            if !pos.is_empty() {
                println!("\nParts of speech: {}", pos.join(", "));
            }
            if !chapters.is_empty() {
                println!("Chapters: {}", chapters.join(", "));
            }
        }
    }

    Ok(())
}

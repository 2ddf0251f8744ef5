mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cidian_lib::interchange::Format;
use cidian_lib::vocab::SortOrder;

#[derive(Parser)]
#[command(name = "cidian", about = "Chinese vocabulary flashcards with spaced repetition", version)]
struct Cli {
    /// Card store directory (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Optional card fields shared by `add` and `edit`
#[derive(Args, Debug, Default)]
pub struct CardFields {
    /// Pinyin transcription
    #[arg(long)]
    pub pinyin: Option<String>,
    /// Part of speech
    #[arg(long)]
    pub pos: Option<String>,
    /// Example sentence (use "-" to read from stdin)
    #[arg(long)]
    pub example: Option<String>,
    /// Chapter or lesson tag
    #[arg(long)]
    pub chapter: Option<String>,
}

/// Deck filters shared by `list` and `review`
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Substring of hanzi, pinyin or meaning (case-insensitive)
    #[arg(long, short)]
    pub query: Option<String>,
    /// Exact part of speech
    #[arg(long)]
    pub pos: Option<String>,
    /// Exact chapter
    #[arg(long)]
    pub chapter: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new card
    Add {
        /// Character form
        hanzi: String,
        /// Meaning
        meaning: String,
        #[command(flatten)]
        fields: CardFields,
    },

    /// Edit an existing card's content (scheduling is kept)
    Edit {
        /// Card id (unique prefix is enough)
        id: String,
        #[arg(long)]
        hanzi: Option<String>,
        #[arg(long)]
        meaning: Option<String>,
        #[command(flatten)]
        fields: CardFields,
    },

    /// Delete a card
    Rm {
        /// Card id (unique prefix is enough)
        id: String,
    },

    /// Delete every card
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Make a card due now
    DueToday {
        /// Card id (unique prefix is enough)
        id: String,
    },

    /// List cards as a table
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Sort order: recent, hanzi or priority
        #[arg(long, default_value = "recent")]
        sort: SortOrder,
    },

    /// Show collection statistics
    Stats,

    /// Export all cards
    Export {
        /// json or csv
        #[arg(value_name = "FORMAT")]
        kind: Format,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Merge cards from a .json or .csv file
    Import {
        file: PathBuf,
    },

    /// Review cards as flashcards
    Review {
        /// Include cards that are not yet due
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        filters: FilterArgs,
        /// Show the meaning first
        #[arg(long)]
        reverse: bool,
    },
}

/// Read content from stdin when given as "-"
fn resolve_content(content: Option<String>) -> Option<String> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
            Some(buf.trim_end().to_string())
        }
        _ => content,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.data_dir.as_deref())?;

    match cli.command {
        None => {
            commands::review::run(&mut app, false, FilterArgs::default(), false, use_color)?;
        }
        Some(Command::Add { hanzi, meaning, mut fields }) => {
            fields.example = resolve_content(fields.example);
            commands::add::run_add(&mut app, hanzi, meaning, fields, &cli.format, use_color)?;
        }
        Some(Command::Edit { id, hanzi, meaning, mut fields }) => {
            fields.example = resolve_content(fields.example);
            commands::add::run_edit(&mut app, &id, hanzi, meaning, fields, &cli.format, use_color)?;
        }
        Some(Command::Rm { id }) => {
            commands::remove::run_rm(&mut app, &id, &cli.format)?;
        }
        Some(Command::Clear { yes }) => {
            commands::remove::run_clear(&mut app, yes, &cli.format)?;
        }
        Some(Command::DueToday { id }) => {
            commands::remove::run_due_today(&mut app, &id, &cli.format)?;
        }
        Some(Command::List { filters, sort }) => {
            commands::list::run(&app, filters, sort, &cli.format, use_color)?;
        }
        Some(Command::Stats) => {
            commands::stats::run(&app, &cli.format, use_color)?;
        }
        Some(Command::Export { kind, output }) => {
            commands::transfer::run_export(&app, kind, output.as_deref())?;
        }
        Some(Command::Import { file }) => {
            commands::transfer::run_import(&mut app, &file, &cli.format)?;
        }
        Some(Command::Review { all, filters, reverse }) => {
            commands::review::run(&mut app, all, filters, reverse, use_color)?;
        }
    }

    Ok(())
}

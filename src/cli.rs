use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::{
    core::{
        pipeline::collect_records,
        utils::read_word_list,
    },
    deck::{
        Deck,
        SerializeReport,
    },
    persistence,
    settings::Settings,
    sources::Language,
};

#[derive(Parser, Debug, Default)]
#[command(name = "verbdeck")]
#[command(about = "Builds a German verb flashcard deck from conjugation and example pages", long_about = None)]
pub struct Cli {
    /// Text file with one verb per line
    pub words: PathBuf,

    /// Only use the first N lines of the word list
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Language of translations and example sentences
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Deck template to append notes to (default: decks/deck_<lang>_sample.json)
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Where to write the merged records
    #[arg(short, long)]
    pub results: Option<PathBuf>,

    /// Where to write the finished deck
    #[arg(short = 'o', long)]
    pub deck_out: Option<PathBuf>,

    /// Settings file (default: settings.json in the app data directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log every request
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags given on the command line win over the settings file.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(limit) = self.limit {
            settings.word_limit = Some(limit);
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(template) = &self.template {
            settings.deck_template = Some(template.clone());
        }
        if let Some(results) = &self.results {
            settings.results_path = results.clone();
        }
        if let Some(deck_out) = &self.deck_out {
            settings.deck_path = deck_out.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub words: usize,
    pub records: usize,
    pub notes: SerializeReport,
}

pub async fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    cli.apply(&mut settings);

    let words = read_word_list(&cli.words, settings.word_limit)
        .with_context(|| format!("Failed to read word list {}", cli.words.display()))?;
    let sources = settings.sources()?;

    // Loaded up front so a broken template fails before any request is sent
    let template_path = settings.deck_template_path();
    let mut deck = Deck::load(&template_path, &settings.note_model_uuid)
        .with_context(|| format!("Failed to load deck template {}", template_path.display()))?;

    info!("Looking up {} words ({})", words.len(), settings.language);
    let records = collect_records(&words, &sources).await?;

    persistence::save_json(&records, &settings.results_path)
        .with_context(|| format!("Failed to write {}", settings.results_path.display()))?;

    let notes = deck.append_records(&records)?;
    if notes.dropped > 0 {
        info!("{} records were not complete enough for a note", notes.dropped);
    }
    deck.save(&settings.deck_path)
        .with_context(|| format!("Failed to write {}", settings.deck_path.display()))?;
    info!("Wrote {} notes to {}", notes.added, settings.deck_path.display());

    Ok(RunSummary { words: words.len(), records: records.len(), notes })
}

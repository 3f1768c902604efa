use std::time::Instant;

use clap::Parser;
use tracing::info;
use verbdeck::{
    cli::{
        self,
        Cli,
    },
    core::logging::init_logging,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let start = Instant::now();
    let summary = cli::run(&cli).await?;
    let elapsed = start.elapsed().as_secs_f64();

    if summary.words > 0 {
        info!(
            "Average time per verb is {:.4}s for {} verbs",
            elapsed / summary.words as f64,
            summary.words
        );
    }
    info!(
        "Executed in {elapsed:.4} seconds ({} records, {} notes)",
        summary.records, summary.notes.added
    );
    Ok(())
}

use crate::reports;
use clap::{ArgMatches, Args};
use rotorforge::config::CrackConfig;
use rotorforge::scorer::NgramScorer;
use rotorforge::search::{ProgressCallback, SearchEngine, SearchOptions, SearchStage};
use rotorforge::RfResult;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CrackArgs {
    #[command(flatten)]
    pub crack: CrackConfig,

    /// JSON search configuration; flags typed explicitly override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Ciphertext. Read from stdin when omitted
    pub ciphertext: Option<String>,
}

struct CliLogger;
impl ProgressCallback for CliLogger {
    fn on_progress(&self, stage: SearchStage, completed: usize, total: usize) {
        let tick = (total / 10).max(1);
        if completed % tick == 0 || completed == total {
            info!("{:>20} | {:6}/{}", stage, completed, total);
        }
    }
}

pub fn run(args: CrackArgs, matches: &ArgMatches) -> RfResult<()> {
    let config = match &args.config {
        Some(path) => {
            info!("📂 Loading search configuration: {}", path.display());
            let mut file_config = CrackConfig::load_from_file(path)?;
            file_config.merge_from_cli(&args.crack, matches);
            file_config
        }
        None => args.crack.clone(),
    };

    let scorer = Arc::new(NgramScorer::from_path(&config.ngrams, config.separator)?);
    let engine = SearchEngine::new(scorer, SearchOptions::from(&config))?;

    let ciphertext = match args.ciphertext {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let started = Instant::now();
    let best = engine.run(&ciphertext, &CliLogger)?;
    info!("⏱️  Search finished in {:.1?}", started.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&best)?);
    } else {
        reports::print_best_settings(&best);
    }
    Ok(())
}

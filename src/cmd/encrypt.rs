use crate::reports;
use clap::{ArgMatches, Args};
use rotorforge::config::MachineConfig;
use rotorforge::machine::Machine;
use rotorforge::RfResult;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub machine: MachineConfig,

    /// JSON machine configuration; flags typed explicitly override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Text to transform. Reads stdin line by line when omitted
    pub text: Option<String>,
}

pub fn run(args: EncryptArgs, matches: &ArgMatches) -> RfResult<()> {
    let config = match &args.config {
        Some(path) => {
            info!("📂 Loading machine configuration: {}", path.display());
            let mut file_config = MachineConfig::load_from_file(path)?;
            file_config.merge_from_cli(&args.machine, matches);
            file_config
        }
        None => args.machine.clone(),
    };

    // Fail on bad settings before printing anything.
    Machine::new(&config)?;
    reports::print_machine_settings(&config);

    match args.text {
        Some(text) => println!("{}", Machine::new(&config)?.transform(&text)),
        None => {
            // Every message starts from the configured positions.
            for line in io::stdin().lock().lines() {
                let line = line?;
                println!("{}", Machine::new(&config)?.transform(&line));
            }
        }
    }
    Ok(())
}

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rotor cipher machine and settings search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt or decrypt text with a configured machine
    Encrypt(cmd::encrypt::EncryptArgs),
    /// Recover machine settings from ciphertext
    Crack(cmd::crack::CrackArgs),
    /// List the built-in rotors and reflectors
    Catalog,
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Logs go to stderr so stdout carries only results.
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    // Flattened config flags live in the subcommand's matches, not the root.
    let sub_matches = matches.subcommand().map(|(_, m)| m).unwrap_or(&matches);

    let result = match cli.command {
        Commands::Encrypt(args) => cmd::encrypt::run(args, sub_matches),
        Commands::Crack(args) => cmd::crack::run(args, sub_matches),
        Commands::Catalog => cmd::catalog::run(),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}

use crate::consts::{DEFAULT_MAX_PAIRS, DEFAULT_TOP_N};
use crate::error::RfResult;
use crate::machine::{RotorPool, Setting};
use clap::parser::ValueSource;
use clap::{ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to set up one machine.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Rotor names, leftmost first (3 or 4)
    #[arg(long, value_delimiter = ',', default_value = "VI,I,III")]
    pub rotors: Vec<String>,

    #[arg(long, default_value = "UKW_B")]
    pub reflector: String,

    /// Start positions, 1-26 or A-Z
    #[arg(long, value_delimiter = ',', default_value = "1,17,12")]
    pub positions: Vec<Setting>,

    /// Ring settings, 1-26 or A-Z
    #[arg(long = "rings", value_delimiter = ',', default_value = "5,13,24")]
    pub ring_settings: Vec<Setting>,

    /// Plugboard pairs, e.g. "AB,CD" or "AB CD"
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "BQ,CR,DI,EJ,KW,MT,OS,PX,UZ,GH"
    )]
    pub plugboard: Vec<String>,

    /// Enforce wartime fitting rules
    #[arg(long, default_value_t = false)]
    pub historic: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            rotors: vec!["VI".into(), "I".into(), "III".into()],
            reflector: "UKW_B".into(),
            positions: vec![Setting::Number(1), Setting::Number(17), Setting::Number(12)],
            ring_settings: vec![Setting::Number(5), Setting::Number(13), Setting::Number(24)],
            plugboard: ["BQ", "CR", "DI", "EJ", "KW", "MT", "OS", "PX", "UZ", "GH"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            historic: false,
        }
    }
}

impl MachineConfig {
    pub fn new<S: Into<Setting> + Copy>(
        rotors: &[&str],
        reflector: &str,
        positions: &[S],
        ring_settings: &[S],
        plugboard: &[&str],
    ) -> Self {
        Self {
            rotors: rotors.iter().map(|s| s.to_string()).collect(),
            reflector: reflector.to_string(),
            positions: positions.iter().map(|&p| p.into()).collect(),
            ring_settings: ring_settings.iter().map(|&r| r.into()).collect(),
            plugboard: plugboard.iter().map(|s| s.to_string()).collect(),
            historic: false,
        }
    }

    pub fn with_historic(mut self, historic: bool) -> Self {
        self.historic = historic;
        self
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrites fields the user typed on the command line, leaving
    /// file-loaded values wherever clap only filled in a default.
    pub fn merge_from_cli(&mut self, cli: &Self, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(rotors);
        update_if_present!(reflector);
        update_if_present!(positions);
        update_if_present!(ring_settings);
        update_if_present!(plugboard);
        update_if_present!(historic);
    }
}

/// Parameters for the three-stage settings search.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrackConfig {
    /// N-gram frequency table, one "<ngram><sep><count>" per line
    #[arg(long, default_value = "frequencies/english_quintgrams.txt")]
    pub ngrams: PathBuf,

    /// Separator between n-gram and count
    #[arg(long, default_value_t = ' ')]
    pub separator: char,

    /// Candidate rotor pool
    #[arg(long = "pool", value_delimiter = ',', default_value = "I,II,III,IV,V")]
    pub rotor_pool: Vec<String>,

    /// Use a preset pool instead (standard5, naval8)
    #[arg(long)]
    pub preset: Option<RotorPool>,

    #[arg(long, default_value = "UKW_B")]
    pub reflector: String,

    /// Stage-1 candidates kept for ring refinement
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Upper bound on plugboard pairs to recover
    #[arg(long, default_value_t = DEFAULT_MAX_PAIRS)]
    pub max_pairs: usize,

    /// Worker threads (defaults to all cores)
    #[arg(long)]
    pub threads: Option<usize>,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self {
            ngrams: PathBuf::from("frequencies/english_quintgrams.txt"),
            separator: ' ',
            rotor_pool: RotorPool::Standard5.names(),
            preset: None,
            reflector: "UKW_B".into(),
            top_n: DEFAULT_TOP_N,
            max_pairs: DEFAULT_MAX_PAIRS,
            threads: None,
        }
    }
}

impl CrackConfig {
    /// The rotor pool after applying a preset, if one was chosen.
    pub fn effective_pool(&self) -> Vec<String> {
        match self.preset {
            Some(preset) => preset.names(),
            None => self.rotor_pool.clone(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn merge_from_cli(&mut self, cli: &Self, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(ngrams);
        update_if_present!(separator);
        update_if_present!(rotor_pool);
        update_if_present!(preset);
        update_if_present!(reflector);
        update_if_present!(top_n);
        update_if_present!(max_pairs);
        update_if_present!(threads);
    }
}

pub mod plugboard;
pub mod rings;
pub mod rotors;
pub mod topn;

pub use self::plugboard::{find_plugboard, PlugboardOutcome};
pub use self::rings::find_ring_settings;
pub use self::rotors::find_rotors_and_positions;
pub use self::topn::{BoundedTopN, SearchCandidate};

use crate::config::{CrackConfig, MachineConfig};
use crate::consts::{ALPHABET_SIZE, DEFAULT_MAX_PAIRS, DEFAULT_TOP_N, STEPPING_ROTORS};
use crate::error::{RfResult, RotorForgeError};
use crate::machine::{ReflectorKind, ReflectorSpec, RotorKind, RotorPool, Setting};
use crate::scorer::NgramScorer;
use crate::util::{indices_to_text, text_to_indices};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use strum_macros::Display;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
pub struct SearchOptions {
    #[builder(default = RotorPool::Standard5.names())]
    pub rotor_pool: Vec<String>,
    #[builder(default = "UKW_B".to_string(), setter(into))]
    pub reflector: String,
    #[builder(default = DEFAULT_TOP_N)]
    pub top_n: usize,
    #[builder(default = DEFAULT_MAX_PAIRS)]
    pub max_pairs: usize,
    /// Worker threads; `None` uses the global rayon pool. Never changes the
    /// result, so it is left out of the fingerprint.
    #[builder(default)]
    #[serde(skip)]
    pub threads: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&CrackConfig> for SearchOptions {
    fn from(cfg: &CrackConfig) -> Self {
        Self {
            rotor_pool: cfg.effective_pool(),
            reflector: cfg.reflector.clone(),
            top_n: cfg.top_n,
            max_pairs: cfg.max_pairs,
            threads: cfg.threads,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SearchStage {
    #[strum(serialize = "rotors & positions")]
    RotorPositions,
    #[strum(serialize = "ring settings")]
    RingSettings,
    #[strum(serialize = "plugboard")]
    Plugboard,
}

pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, stage: SearchStage, completed: usize, total: usize);
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _stage: SearchStage, _completed: usize, _total: usize) {}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub stage1_trials: usize,
    pub stage1_retained: usize,
    pub stage2_trials: usize,
    pub stage3_rounds: usize,
    pub stage3_trials: usize,
}

/// The recovered settings, 1-based as an operator would dial them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSettings {
    pub rotors: Vec<String>,
    pub reflector: String,
    pub positions: Vec<u8>,
    pub ring_settings: Vec<u8>,
    pub plugboard: Vec<String>,
    pub score: f64,
    pub decrypted: String,
    pub stats: SearchStats,
    /// SHA-256 over ciphertext, options and scoring table.
    pub fingerprint: String,
}

impl BestSettings {
    /// A configuration that reproduces `decrypted` from the ciphertext.
    pub fn machine_config(&self) -> MachineConfig {
        let settings = |values: &[u8]| {
            values
                .iter()
                .map(|&v| Setting::Number(v as i32))
                .collect::<Vec<_>>()
        };
        MachineConfig {
            rotors: self.rotors.clone(),
            reflector: self.reflector.clone(),
            positions: settings(&self.positions),
            ring_settings: settings(&self.ring_settings),
            plugboard: self.plugboard.clone(),
            historic: false,
        }
    }
}

/// Runs the three search stages against one scoring model.
pub struct SearchEngine {
    scorer: Arc<NgramScorer>,
    options: SearchOptions,
    pool: Vec<RotorKind>,
    reflector: ReflectorKind,
}

impl SearchEngine {
    pub fn new(scorer: Arc<NgramScorer>, options: SearchOptions) -> RfResult<Self> {
        let mut pool = Vec::with_capacity(options.rotor_pool.len());
        for name in &options.rotor_pool {
            let kind = RotorKind::from_name(name)?;
            if !pool.contains(&kind) {
                pool.push(kind);
            }
        }
        if pool.len() < options.rotor_pool.len() {
            warn!(
                "Rotor pool had duplicates; searching {} distinct rotors",
                pool.len()
            );
        }
        ensure_search_space(&pool, options.top_n)?;

        let reflector = ReflectorKind::from_name(&options.reflector)?;
        if options.max_pairs > ALPHABET_SIZE {
            return Err(RotorForgeError::Config(format!(
                "max_pairs must be within 0..={}, got {}",
                ALPHABET_SIZE, options.max_pairs
            )));
        }

        Ok(Self {
            scorer,
            options,
            pool,
            reflector,
        })
    }

    /// Distinct rotors searched, in the order given.
    pub fn pool(&self) -> &[RotorKind] {
        &self.pool
    }

    pub fn run<CB: ProgressCallback>(&self, ciphertext: &str, progress: &CB) -> RfResult<BestSettings> {
        let indices = text_to_indices(ciphertext);
        if indices.is_empty() {
            return Err(RotorForgeError::Config(
                "Ciphertext contains no letters".to_string(),
            ));
        }

        match self.options.threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| RotorForgeError::ThreadPool(e.to_string()))?;
                pool.install(|| self.run_stages(ciphertext, &indices, progress))
            }
            None => self.run_stages(ciphertext, &indices, progress),
        }
    }

    fn run_stages<CB: ProgressCallback>(
        &self,
        ciphertext: &str,
        indices: &[u8],
        progress: &CB,
    ) -> RfResult<BestSettings> {
        let scorer = self.scorer.as_ref();
        let reflector = self.reflector.spec();
        info!(
            "🔍 Searching {} letters, pool {:?}, reflector {}",
            indices.len(),
            self.pool.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
            self.reflector
        );

        let (candidates, stage1_trials) = find_rotors_and_positions(
            indices,
            scorer,
            &self.pool,
            reflector,
            self.options.top_n,
            progress,
        )?;
        let (ring_best, stage2_trials) =
            find_ring_settings(indices, scorer, &candidates, reflector, progress)?;
        let outcome = find_plugboard(
            indices,
            scorer,
            ring_best,
            self.options.max_pairs,
            reflector,
            progress,
        )?;

        let best = outcome.best;
        let mut machine = best.build_machine(reflector)?;
        let mut plain = Vec::with_capacity(indices.len());
        machine.transform_indices(indices, &mut plain);

        let stats = SearchStats {
            stage1_trials,
            stage1_retained: candidates.len(),
            stage2_trials,
            stage3_rounds: outcome.rounds,
            stage3_trials: outcome.trials,
        };
        let result = BestSettings {
            rotors: best.rotor_names(),
            reflector: self.reflector.to_string(),
            positions: best.display_positions(),
            ring_settings: best.display_rings(),
            plugboard: best.plugboard_strings(),
            score: best.score,
            decrypted: indices_to_text(&plain),
            stats,
            fingerprint: self.fingerprint(ciphertext)?,
        };
        info!("✅ Best score {:.2}: {}", result.score, result.decrypted);
        Ok(result)
    }

    fn fingerprint(&self, ciphertext: &str) -> RfResult<String> {
        let mut hasher = Sha256::new();
        hasher.update(ciphertext.as_bytes());
        hasher.update(serde_json::to_string(&self.options)?.as_bytes());
        hasher.update(self.scorer.digest().as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Searches for the settings that produced `ciphertext`.
pub fn search(
    ciphertext: &str,
    model: Arc<NgramScorer>,
    rotor_pool: &[&str],
    reflector: &str,
    top_n: usize,
    max_pairs: usize,
) -> RfResult<BestSettings> {
    let options = SearchOptions::builder()
        .rotor_pool(rotor_pool.iter().map(|s| s.to_string()).collect())
        .reflector(reflector)
        .top_n(top_n)
        .max_pairs(max_pairs)
        .build();
    SearchEngine::new(model, options)?.run(ciphertext, &NoProgress)
}

pub(crate) fn ensure_search_space(pool: &[RotorKind], top_n: usize) -> RfResult<()> {
    if pool.len() < STEPPING_ROTORS {
        return Err(RotorForgeError::SearchSpaceEmpty(format!(
            "Rotor pool needs at least {} distinct rotors, found {}",
            STEPPING_ROTORS,
            pool.len()
        )));
    }
    if top_n == 0 {
        return Err(RotorForgeError::SearchSpaceEmpty(
            "top_n must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Deciphers with a fresh machine for `candidate` and scores the result.
pub(crate) fn evaluate(
    candidate: &SearchCandidate,
    ciphertext: &[u8],
    scorer: &NgramScorer,
    reflector: &ReflectorSpec,
    buf: &mut Vec<u8>,
) -> RfResult<f64> {
    let mut machine = candidate.build_machine(reflector)?;
    buf.clear();
    machine.transform_indices(ciphertext, buf);
    Ok(scorer.score_indices(buf))
}

use crate::consts::{ALPHABET_SIZE, MAX_PLUG_PAIRS};
use crate::error::RfResult;
use crate::machine::ReflectorSpec;
use crate::scorer::NgramScorer;
use crate::search::topn::SearchCandidate;
use crate::search::{evaluate, ProgressCallback, SearchStage};
use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Result of the greedy plugboard climb.
#[derive(Debug, Clone)]
pub struct PlugboardOutcome {
    pub best: SearchCandidate,
    pub rounds: usize,
    pub trials: usize,
}

/// Stage 3: greedy hill climb over plugboard pairs.
///
/// Each round tries every pair of still-unplugged letters on top of the
/// pairs committed so far and keeps the best one, but only if it beats the
/// current score. The first round that cannot improve ends the climb. This
/// is a heuristic and may miss the optimal plugboard.
pub fn find_plugboard<CB: ProgressCallback>(
    ciphertext: &[u8],
    scorer: &NgramScorer,
    start: SearchCandidate,
    max_pairs: usize,
    reflector: &ReflectorSpec,
    progress: &CB,
) -> RfResult<PlugboardOutcome> {
    let rounds_limit = if max_pairs > MAX_PLUG_PAIRS {
        warn!(
            "max_pairs {} exceeds the plugboard's {} cables, capping",
            max_pairs, MAX_PLUG_PAIRS
        );
        MAX_PLUG_PAIRS
    } else {
        max_pairs
    };

    let mut current = start;
    let mut available: Vec<u8> = (0..ALPHABET_SIZE as u8).collect();
    let mut rounds = 0;
    let mut trials = 0;

    info!("Stage 3: up to {} plugboard rounds", rounds_limit);
    while rounds < rounds_limit {
        rounds += 1;

        let pairs: Vec<(u8, u8)> = available.iter().copied().tuple_combinations().collect();
        trials += pairs.len();

        let scored = pairs
            .par_iter()
            .map_init(
                || Vec::with_capacity(ciphertext.len()),
                |buf, &pair| -> RfResult<(f64, (u8, u8))> {
                    let mut trial = current.clone();
                    trial.plugboard.push(pair);
                    Ok((evaluate(&trial, ciphertext, scorer, reflector, buf)?, pair))
                },
            )
            .collect::<RfResult<Vec<_>>>()?;

        // First pair in enumeration order wins a tie.
        let top = scored
            .into_iter()
            .reduce(|best, next| if next.0 > best.0 { next } else { best });
        progress.on_progress(SearchStage::Plugboard, rounds, rounds_limit);

        match top {
            Some((score, (a, b))) if score > current.score => {
                debug!(
                    "Round {}: plug {}{} ({:.2} -> {:.2})",
                    rounds,
                    (b'A' + a) as char,
                    (b'A' + b) as char,
                    current.score,
                    score
                );
                current.score = score;
                current.plugboard.push((a, b));
                available.retain(|&c| c != a && c != b);
            }
            _ => {
                debug!("Round {}: no pair improves {:.2}, stopping", rounds, current.score);
                break;
            }
        }
    }

    info!(
        "Stage 3 best: plugboard {:?} (score {:.2})",
        current.plugboard_strings(),
        current.score
    );
    Ok(PlugboardOutcome {
        best: current,
        rounds,
        trials,
    })
}

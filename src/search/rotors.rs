use crate::consts::ALPHABET_SIZE;
use crate::error::RfResult;
use crate::machine::{ReflectorSpec, RotorKind};
use crate::scorer::NgramScorer;
use crate::search::topn::{BoundedTopN, SearchCandidate};
use crate::search::{ensure_search_space, evaluate, ProgressCallback, SearchStage};
use itertools::{iproduct, Itertools};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Stage 1: every ordered choice of three distinct rotors from the pool at
/// every start position, ring settings at A and no plugboard. A rotor listed
/// twice in the pool counts once. Returns the best `top_n` candidates (best
/// first) and the number of trials run.
pub fn find_rotors_and_positions<CB: ProgressCallback>(
    ciphertext: &[u8],
    scorer: &NgramScorer,
    pool: &[RotorKind],
    reflector: &ReflectorSpec,
    top_n: usize,
    progress: &CB,
) -> RfResult<(Vec<SearchCandidate>, usize)> {
    let pool: Vec<RotorKind> = pool.iter().copied().unique().collect();
    ensure_search_space(&pool, top_n)?;

    let arrangements: Vec<[RotorKind; 3]> = pool
        .iter()
        .copied()
        .permutations(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    // One work unit per (arrangement, leftmost position).
    let units: Vec<(usize, u8)> =
        iproduct!(0..arrangements.len(), 0..ALPHABET_SIZE as u8).collect();
    let total_units = units.len();
    let trials = total_units * ALPHABET_SIZE * ALPHABET_SIZE;
    info!(
        "Stage 1: {} rotor orders x {} positions = {} trials",
        arrangements.len(),
        ALPHABET_SIZE.pow(3),
        trials
    );

    let completed = AtomicUsize::new(0);
    let top = units
        .par_iter()
        .try_fold(
            || BoundedTopN::new(top_n),
            |mut local, &(arrangement, p0)| -> RfResult<BoundedTopN<SearchCandidate>> {
                let rotors = arrangements[arrangement];
                let mut buf = Vec::with_capacity(ciphertext.len());
                for (p1, p2) in iproduct!(0..ALPHABET_SIZE as u8, 0..ALPHABET_SIZE as u8) {
                    let mut candidate = SearchCandidate::new(rotors, [p0, p1, p2]);
                    candidate.score = evaluate(&candidate, ciphertext, scorer, reflector, &mut buf)?;
                    local.push(candidate);
                }
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                progress.on_progress(SearchStage::RotorPositions, done, total_units);
                Ok(local)
            },
        )
        .try_reduce(
            || BoundedTopN::new(top_n),
            |mut a, b| {
                a.merge(b);
                Ok(a)
            },
        )?;

    let candidates = top.into_sorted_vec();
    if let Some(best) = candidates.first() {
        info!(
            "Stage 1 best: {:?} @ {:?} (score {:.2}), {} candidates kept",
            best.rotor_names(),
            best.display_positions(),
            best.score,
            candidates.len()
        );
    }
    Ok((candidates, trials))
}

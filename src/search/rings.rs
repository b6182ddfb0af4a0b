use crate::consts::ALPHABET_SIZE;
use crate::error::{RfResult, RotorForgeError};
use crate::machine::ReflectorSpec;
use crate::scorer::NgramScorer;
use crate::search::topn::SearchCandidate;
use crate::search::{evaluate, ProgressCallback, SearchStage};
use itertools::iproduct;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Stage 2: for each stage-1 candidate, every ring setting of the middle and
/// right rotors (left ring stays at A). Start positions move with the rings
/// so each rotor keeps the alignment stage 1 found. Only the single best
/// trial survives; on equal scores the earlier candidate and lower rings win.
pub fn find_ring_settings<CB: ProgressCallback>(
    ciphertext: &[u8],
    scorer: &NgramScorer,
    candidates: &[SearchCandidate],
    reflector: &ReflectorSpec,
    progress: &CB,
) -> RfResult<(SearchCandidate, usize)> {
    if candidates.is_empty() {
        return Err(RotorForgeError::SearchSpaceEmpty(
            "No rotor candidates to refine ring settings for".to_string(),
        ));
    }

    let per_candidate = ALPHABET_SIZE * ALPHABET_SIZE;
    let trials = candidates.len() * per_candidate;
    info!(
        "Stage 2: {} candidates x {} ring settings = {} trials",
        candidates.len(),
        per_candidate,
        trials
    );

    let completed = AtomicUsize::new(0);
    let bests = candidates
        .par_iter()
        .map(|base| -> RfResult<SearchCandidate> {
            let mut buf = Vec::with_capacity(ciphertext.len());
            let mut best: Option<SearchCandidate> = None;
            for (r1, r2) in iproduct!(0..ALPHABET_SIZE as u8, 0..ALPHABET_SIZE as u8) {
                let mut trial = base.clone();
                trial.rings = [0, r1, r2];
                trial.positions = [
                    base.positions[0],
                    (base.positions[1] + r1) % ALPHABET_SIZE as u8,
                    (base.positions[2] + r2) % ALPHABET_SIZE as u8,
                ];
                trial.score = evaluate(&trial, ciphertext, scorer, reflector, &mut buf)?;
                if best.as_ref().map_or(true, |b| trial.score > b.score) {
                    best = Some(trial);
                }
            }
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress.on_progress(SearchStage::RingSettings, done, candidates.len());
            best.ok_or_else(|| {
                RotorForgeError::SearchSpaceEmpty("Ring search produced no trials".to_string())
            })
        })
        .collect::<RfResult<Vec<_>>>()?;

    // Collected in candidate order, so a strict comparison keeps the earliest.
    let best = bests
        .into_iter()
        .reduce(|best, next| if next.score > best.score { next } else { best })
        .ok_or_else(|| RotorForgeError::SearchSpaceEmpty("No ring candidates".to_string()))?;

    info!(
        "Stage 2 best: {:?} @ {:?} rings {:?} (score {:.2})",
        best.rotor_names(),
        best.display_positions(),
        best.display_rings(),
        best.score
    );
    Ok((best, trials))
}

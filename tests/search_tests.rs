mod common;

use common::{encrypt, trigram_scorer, CORPUS};
use rotorforge::consts::MAX_PLUG_PAIRS;
use rotorforge::machine::{Machine, ReflectorKind, RotorKind};
use rotorforge::scorer::NgramScorer;
use rotorforge::search::{
    find_plugboard, find_ring_settings, find_rotors_and_positions, search, NoProgress,
    SearchCandidate, SearchEngine, SearchOptions,
};
use rotorforge::util::text_to_indices;
use rotorforge::RotorForgeError;
use rstest::rstest;
use std::io::Cursor;
use std::sync::Arc;

const POOL: [&str; 3] = ["I", "II", "III"];
const KINDS: [RotorKind; 3] = [RotorKind::I, RotorKind::II, RotorKind::III];
const TRIALS_3: usize = 6 * 26 * 26 * 26;

fn plaintext(len: usize) -> &'static str {
    &CORPUS[..len]
}

fn engine(options: SearchOptions) -> Result<SearchEngine, RotorForgeError> {
    SearchEngine::new(Arc::new(trigram_scorer(CORPUS)), options)
}

/// A five-letter table; anything shorter than five letters scores 0.0, so
/// every trial on such text ties.
fn flat_scorer() -> NgramScorer {
    NgramScorer::from_reader(Cursor::new("ABCDE 1\n"), ' ').unwrap()
}

/// Single letters where E is a thousand times likelier than the rest.
fn letter_e_scorer() -> NgramScorer {
    let table: String = ('A'..='Z')
        .map(|c| format!("{} {}\n", c, if c == 'E' { 1000 } else { 1 }))
        .collect();
    NgramScorer::from_reader(Cursor::new(table), ' ').unwrap()
}

// --- VALIDATION ---

#[rstest]
#[case(&["I", "II"], 10)]
#[case(&["I", "I", "II"], 10)]
#[case(&[], 10)]
#[case(&["I", "II", "III"], 0)]
fn test_empty_search_space(#[case] pool: &[&str], #[case] top_n: usize) {
    let options = SearchOptions::builder()
        .rotor_pool(pool.iter().map(|s| s.to_string()).collect())
        .top_n(top_n)
        .build();
    let err = engine(options).err().unwrap();
    assert!(matches!(err, RotorForgeError::SearchSpaceEmpty(_)), "{}", err);
}

#[test]
fn test_unknown_pool_rotor_is_config_error() {
    let options = SearchOptions::builder()
        .rotor_pool(vec!["I".into(), "II".into(), "XI".into()])
        .build();
    assert!(matches!(engine(options), Err(RotorForgeError::Config(_))));
}

#[test]
fn test_max_pairs_above_alphabet_rejected() {
    let options = SearchOptions::builder().max_pairs(27).build();
    assert!(matches!(engine(options), Err(RotorForgeError::Config(_))));
}

#[test]
fn test_ciphertext_without_letters_rejected() {
    let e = engine(SearchOptions::default()).unwrap();
    let err = e.run("1234 !?", &NoProgress).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_pool_duplicates_are_dropped() {
    let options = SearchOptions::builder()
        .rotor_pool(vec!["I".into(), "ii".into(), "I".into(), "III".into()])
        .build();
    assert_eq!(engine(options).unwrap().pool(), &KINDS);
}

// --- STAGE 1 ---

#[test]
fn test_stage_one_is_bounded() {
    let scorer = trigram_scorer(CORPUS);
    let cipher = text_to_indices(&encrypt(&POOL, &[2, 3, 4], &[1, 1, 1], &[], plaintext(12)));
    let ukw = ReflectorKind::UkwB.spec();

    let (top, trials) = find_rotors_and_positions(&cipher, &scorer, &KINDS, ukw, 25, &NoProgress).unwrap();
    assert_eq!(trials, TRIALS_3);
    assert_eq!(top.len(), 25);
    assert!(top.windows(2).all(|w| w[0].score >= w[1].score));

    let (all, trials) =
        find_rotors_and_positions(&cipher, &scorer, &KINDS, ukw, 1_000_000, &NoProgress).unwrap();
    assert_eq!(all.len(), trials);
}

#[test]
fn test_stage_one_skips_repeated_rotors() {
    let scorer = trigram_scorer(CORPUS);
    let cipher = text_to_indices(plaintext(12));
    let ukw = ReflectorKind::UkwB.spec();

    let err = find_rotors_and_positions(
        &cipher,
        &scorer,
        &[RotorKind::I, RotorKind::I, RotorKind::II],
        ukw,
        10,
        &NoProgress,
    )
    .unwrap_err();
    assert!(matches!(err, RotorForgeError::SearchSpaceEmpty(_)), "{}", err);

    let pool = [RotorKind::I, RotorKind::II, RotorKind::I, RotorKind::III];
    let (all, trials) = find_rotors_and_positions(&cipher, &scorer, &pool, ukw, 1_000_000, &NoProgress).unwrap();
    assert_eq!(trials, TRIALS_3);
    assert_eq!(all.len(), TRIALS_3);
    assert!(all
        .iter()
        .all(|c| c.rotors[0] != c.rotors[1] && c.rotors[1] != c.rotors[2] && c.rotors[0] != c.rotors[2]));
}

// --- STAGE 2 ---

#[test]
fn test_ring_tie_keeps_earliest_candidate() {
    let scorer = flat_scorer();
    let cipher = text_to_indices("QWER");
    let ukw = ReflectorKind::UkwB.spec();
    // Listed ahead of a candidate whose settings sort lower.
    let candidates = vec![
        SearchCandidate::new([RotorKind::III, RotorKind::I, RotorKind::II], [5, 6, 7]),
        SearchCandidate::new(KINDS, [0, 0, 0]),
    ];

    let (best, trials) = find_ring_settings(&cipher, &scorer, &candidates, ukw, &NoProgress).unwrap();
    assert_eq!(trials, 2 * 26 * 26);
    assert_eq!(best.score, 0.0);
    assert_eq!(best.rotors, [RotorKind::III, RotorKind::I, RotorKind::II]);
    assert_eq!(best.rings, [0, 0, 0]);
    assert_eq!(best.positions, [5, 6, 7]);
}

#[test]
fn test_stages_recover_unplugged_settings() {
    let scorer = trigram_scorer(CORPUS);
    let ukw = ReflectorKind::UkwB.spec();
    let cipher = text_to_indices(&encrypt(&["III", "I", "II"], &[5, 20, 9], &[1, 1, 1], &[], plaintext(90)));

    let (top, _) = find_rotors_and_positions(&cipher, &scorer, &KINDS, ukw, 5, &NoProgress).unwrap();
    assert_eq!(top[0].rotors, [RotorKind::III, RotorKind::I, RotorKind::II]);
    assert_eq!(top[0].positions, [4, 19, 8]);

    let (best, trials) = find_ring_settings(&cipher, &scorer, &top, ukw, &NoProgress).unwrap();
    assert_eq!(trials, 5 * 26 * 26);
    assert_eq!(best.rings, [0, 0, 0]);
    assert_eq!(best.positions, [4, 19, 8]);
    assert!(best.score >= top[0].score);
}

// --- STAGE 3 ---

#[test]
fn test_plugboard_climb_finds_strongest_pair_first() {
    let scorer = trigram_scorer(CORPUS);
    let ukw = ReflectorKind::UkwB.spec();
    let cipher = text_to_indices(&encrypt(&POOL, &[7, 2, 15], &[1, 1, 1], &["ET"], plaintext(120)));

    let mut start = SearchCandidate::new(KINDS, [6, 1, 14]);
    let mut buf = Vec::new();
    start.build_machine(ukw).unwrap().transform_indices(&cipher, &mut buf);
    start.score = scorer.score_indices(&buf);

    let outcome = find_plugboard(&cipher, &scorer, start.clone(), 3, ukw, &NoProgress).unwrap();
    assert_eq!(outcome.best.plugboard.first(), Some(&(4, 19)));
    assert!(outcome.rounds <= 3);
    assert!(outcome.best.score > start.score);
    assert!(outcome.trials >= 325);
}

#[test]
fn test_plugboard_tie_takes_first_pair() {
    let scorer = flat_scorer();
    let cipher = text_to_indices("QWER");
    let ukw = ReflectorKind::UkwB.spec();
    let start = SearchCandidate::new(KINDS, [0, 0, 0]);

    // Every pair scores 0.0: the first beats the unscored start, then
    // nothing is strictly better.
    let outcome = find_plugboard(&cipher, &scorer, start, 5, ukw, &NoProgress).unwrap();
    assert_eq!(outcome.best.plugboard, vec![(0, 1)]);
    assert_eq!(outcome.rounds, 2);
    assert_eq!(outcome.trials, 325 + 276);
}

#[test]
fn test_plugboard_rounds_are_capped() {
    let scorer = letter_e_scorer();
    let cipher = text_to_indices(CORPUS);
    let ukw = ReflectorKind::UkwB.spec();
    let start = SearchCandidate::new(KINDS, [0, 0, 0]);

    // This climb keeps finding more E's for ten rounds.
    let outcome = find_plugboard(&cipher, &scorer, start, 26, ukw, &NoProgress).unwrap();
    assert_eq!(outcome.rounds, MAX_PLUG_PAIRS);
    assert_eq!(outcome.best.plugboard.len(), MAX_PLUG_PAIRS);
    let trials: usize = (0..MAX_PLUG_PAIRS).map(|k| (26 - 2 * k) * (25 - 2 * k) / 2).sum();
    assert_eq!(outcome.trials, trials);
}

#[test]
fn test_plugboard_zero_rounds_keeps_start() {
    let scorer = trigram_scorer(CORPUS);
    let ukw = ReflectorKind::UkwB.spec();
    let cipher = text_to_indices(plaintext(30));
    let start = SearchCandidate::new(KINDS, [0, 0, 0]);

    let outcome = find_plugboard(&cipher, &scorer, start, 0, ukw, &NoProgress).unwrap();
    assert_eq!(outcome.rounds, 0);
    assert_eq!(outcome.trials, 0);
    assert!(outcome.best.plugboard.is_empty());
}

// --- END TO END ---

#[test]
fn test_search_recovers_plaintext() {
    let plain = plaintext(90);
    let cipher = encrypt(&["II", "III", "I"], &[11, 3, 24], &[1, 1, 1], &[], plain);

    let best = search(&cipher, Arc::new(trigram_scorer(CORPUS)), &POOL, "UKW_B", 5, 0).unwrap();
    assert_eq!(best.decrypted, plain);
    assert_eq!(best.rotors, vec!["II", "III", "I"]);
    assert_eq!(best.positions, vec![11, 3, 24]);
    assert_eq!(best.ring_settings, vec![1, 1, 1]);
    assert_eq!(best.stats.stage1_trials, TRIALS_3);
    assert_eq!(best.stats.stage1_retained, 5);
    assert_eq!(best.stats.stage3_rounds, 0);
}

#[test]
fn test_result_is_self_consistent() {
    let scorer = Arc::new(trigram_scorer(CORPUS));
    let cipher = encrypt(&POOL, &[1, 14, 7], &[1, 1, 1], &["QK"], plaintext(60));
    let best = search(&cipher, scorer.clone(), &POOL, "UKW_B", 3, 2).unwrap();

    assert!(best.stats.stage3_rounds <= 2);
    assert!(best.plugboard.len() <= best.stats.stage3_rounds);
    assert_eq!(best.score, scorer.score(&best.decrypted));

    // The reported settings reproduce the reported plaintext.
    let mut machine = Machine::new(&best.machine_config()).unwrap();
    assert_eq!(machine.transform(&cipher), best.decrypted);
}

#[test]
fn test_thread_count_does_not_change_result() {
    let cipher = encrypt(&POOL, &[20, 8, 1], &[1, 1, 1], &["AM"], plaintext(40));
    let run = |threads: usize| {
        let options = SearchOptions::builder()
            .rotor_pool(POOL.iter().map(|s| s.to_string()).collect())
            .top_n(20)
            .max_pairs(2)
            .threads(Some(threads))
            .build();
        engine(options).unwrap().run(&cipher, &NoProgress).unwrap()
    };

    let single = run(1);
    let many = run(4);
    assert_eq!(single, many);
    assert_eq!(single.fingerprint.len(), 64);
}

#[test]
fn test_fingerprint_tracks_inputs() {
    let scorer = Arc::new(trigram_scorer(CORPUS));
    let a = search("ABCDEFGHIJ", scorer.clone(), &POOL, "UKW_B", 2, 0).unwrap();
    let b = search("ABCDEFGHIJ", scorer.clone(), &POOL, "UKW_B", 2, 0).unwrap();
    let c = search("ABCDEFGHIJ", scorer, &POOL, "UKW_B", 3, 0).unwrap();
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_ne!(a.fingerprint, c.fingerprint);
}

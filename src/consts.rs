/// Size of the fixed Latin alphabet every wiring table is defined over.
pub const ALPHABET_SIZE: usize = 26;

/// A physical plugboard ships with ten cables.
pub const MAX_PLUG_PAIRS: usize = 10;

/// Number of rotors that take part in stepping. A fourth (leftmost) rotor
/// never moves.
pub const STEPPING_ROTORS: usize = 3;

/// Pseudo-count used to derive the log-probability of unseen n-grams.
pub const FLOOR_PSEUDO_COUNT: f64 = 0.01;

/// N-grams up to this length are stored in a dense table (26^4 slots).
pub const DENSE_NGRAM_MAX_LEN: usize = 4;

/// Longest n-gram whose base-26 code still fits in a u64.
pub const MAX_NGRAM_LEN: usize = 13;

/// Default number of stage-1 candidates carried into ring refinement.
pub const DEFAULT_TOP_N: usize = 1000;

/// Default upper bound on greedy plugboard rounds.
pub const DEFAULT_MAX_PAIRS: usize = 10;

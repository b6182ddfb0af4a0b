pub mod loader;

use self::loader::{load_ngram_counts, load_ngram_file, RawNgramCounts};
use crate::consts::{ALPHABET_SIZE, DENSE_NGRAM_MAX_LEN, FLOOR_PSEUDO_COUNT, MAX_NGRAM_LEN};
use crate::error::{RfResult, RotorForgeError};
use crate::util::letter_index;
use fnv::FnvHashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
enum NgramTable {
    /// Indexed by the base-26 code of the n-gram; unseen slots hold `floor`.
    Dense(Vec<f64>),
    Sparse(FnvHashMap<u64, f64>),
}

/// Log-probability language model over fixed-length letter n-grams.
///
/// Every count becomes `log10(count / total)`; anything absent from the
/// table scores `log10(0.01 / total)`. Higher scores mean more language-like
/// text.
#[derive(Debug, Clone)]
pub struct NgramScorer {
    ngram_len: usize,
    floor: f64,
    total: u64,
    entries: usize,
    table: NgramTable,
    digest: String,
}

impl NgramScorer {
    pub fn from_path<P: AsRef<Path>>(path: P, separator: char) -> RfResult<Self> {
        let path = path.as_ref();
        info!("📚 Loading n-gram table: {}", path.display());
        Self::from_counts(load_ngram_file(path, separator)?)
    }

    pub fn from_reader<R: Read>(reader: R, separator: char) -> RfResult<Self> {
        Self::from_counts(load_ngram_counts(reader, separator)?)
    }

    pub fn from_counts(raw: RawNgramCounts) -> RfResult<Self> {
        // The last entry read fixes the n-gram length.
        let ngram_len = raw
            .entries
            .last()
            .map(|(token, _)| token.chars().count())
            .unwrap_or(0);
        if ngram_len == 0 || ngram_len > MAX_NGRAM_LEN {
            return Err(RotorForgeError::Resource(format!(
                "N-gram length {} is outside 1..={}",
                ngram_len, MAX_NGRAM_LEN
            )));
        }

        // Repeated tokens overwrite, and only the surviving count is totalled.
        let mut counts: FnvHashMap<String, u64> = FnvHashMap::default();
        for (token, count) in raw.entries {
            counts.insert(token, count);
        }
        let total = counts.values().try_fold(0u64, |acc, &c| acc.checked_add(c));
        let total = total.ok_or_else(|| {
            RotorForgeError::Resource("N-gram counts overflow a 64-bit total".to_string())
        })?;

        let n = total as f64;
        let floor = (FLOOR_PSEUDO_COUNT / n).log10();

        let mut table = if ngram_len <= DENSE_NGRAM_MAX_LEN {
            NgramTable::Dense(vec![floor; ALPHABET_SIZE.pow(ngram_len as u32)])
        } else {
            NgramTable::Sparse(FnvHashMap::default())
        };

        let mut stored = 0;
        let mut unmatched = 0;
        for (token, count) in &counts {
            let Some(code) = encode(token, ngram_len) else {
                unmatched += 1;
                continue;
            };
            let log_prob = (*count as f64 / n).log10();
            match &mut table {
                NgramTable::Dense(slots) => slots[code as usize] = log_prob,
                NgramTable::Sparse(map) => {
                    map.insert(code, log_prob);
                }
            }
            stored += 1;
        }

        if unmatched > 0 {
            warn!(
                "{} n-grams are not {} letters long and can never match",
                unmatched, ngram_len
            );
        }
        debug!(
            "N-gram table: L={}, {} entries, total={}, floor={:.4}",
            ngram_len, stored, total, floor
        );

        Ok(Self {
            ngram_len,
            floor,
            total,
            entries: stored,
            table,
            digest: raw.digest,
        })
    }

    #[inline(always)]
    fn lookup(&self, code: u64) -> f64 {
        match &self.table {
            NgramTable::Dense(slots) => slots[code as usize],
            NgramTable::Sparse(map) => map.get(&code).copied().unwrap_or(self.floor),
        }
    }

    /// Scores 0-based letter indices. This is the search hot path.
    pub fn score_indices(&self, text: &[u8]) -> f64 {
        let l = self.ngram_len;
        if text.len() < l {
            return 0.0;
        }
        let high = (ALPHABET_SIZE as u64).pow(l as u32 - 1);

        let mut code = 0u64;
        for &c in &text[..l - 1] {
            code = code * ALPHABET_SIZE as u64 + c as u64;
        }

        let mut score = 0.0;
        for &c in &text[l - 1..] {
            code = code * ALPHABET_SIZE as u64 + c as u64;
            score += self.lookup(code);
            code %= high;
        }
        score
    }

    /// Scores arbitrary text. Letters are case-folded; a window that
    /// contains any other character scores `floor`.
    pub fn score(&self, text: &str) -> f64 {
        let l = self.ngram_len;
        let high = (ALPHABET_SIZE as u64).pow(l as u32 - 1);

        let mut score = 0.0;
        let mut code = 0u64;
        let mut run = 0usize;
        for (i, ch) in text.chars().enumerate() {
            match letter_index(ch) {
                Some(c) => {
                    code = (code % high) * ALPHABET_SIZE as u64 + c as u64;
                    run += 1;
                }
                None => {
                    code = 0;
                    run = 0;
                }
            }
            if i + 1 >= l {
                score += if run >= l { self.lookup(code) } else { self.floor };
            }
        }
        score
    }

    pub fn ngram_len(&self) -> usize {
        self.ngram_len
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Sum of all counts in the table.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of matchable n-grams held.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// SHA-256 of the bytes the table was loaded from.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

fn encode(token: &str, len: usize) -> Option<u64> {
    if token.len() != len {
        return None;
    }
    token.chars().try_fold(0u64, |acc, ch| {
        if ch.is_ascii_uppercase() {
            Some(acc * ALPHABET_SIZE as u64 + (ch as u8 - b'A') as u64)
        } else {
            None
        }
    })
}

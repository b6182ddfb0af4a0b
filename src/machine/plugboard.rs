use crate::consts::{ALPHABET_SIZE, MAX_PLUG_PAIRS};
use crate::error::{RfResult, RotorForgeError};

/// Self-inverse letter swap applied on the way into and out of the rotors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugboard {
    wiring: [u8; ALPHABET_SIZE],
    pairs: Vec<(u8, u8)>,
}

impl Default for Plugboard {
    fn default() -> Self {
        let mut wiring = [0u8; ALPHABET_SIZE];
        for (i, w) in wiring.iter_mut().enumerate() {
            *w = i as u8;
        }
        Self {
            wiring,
            pairs: Vec::new(),
        }
    }
}

impl Plugboard {
    /// Parses a whitespace separated list of pairs, e.g. `"AB CD EF"`.
    pub fn parse(connections: &str) -> RfResult<Self> {
        Self::from_pairs(&[connections])
    }

    /// Each entry may hold one pair (`"AB"`) or several (`"AB CD"`).
    pub fn from_pairs<S: AsRef<str>>(entries: &[S]) -> RfResult<Self> {
        let mut pairs = Vec::new();
        for token in entries.iter().flat_map(|e| e.as_ref().split_whitespace()) {
            let bytes = token.as_bytes();
            if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
                return Err(RotorForgeError::Config(format!(
                    "Plugboard pair '{}' must be exactly two letters",
                    token
                )));
            }
            pairs.push((
                bytes[0].to_ascii_uppercase() - b'A',
                bytes[1].to_ascii_uppercase() - b'A',
            ));
        }
        Self::from_index_pairs(&pairs)
    }

    /// Builds the board from 0-based letter pairs.
    pub fn from_index_pairs(pairs: &[(u8, u8)]) -> RfResult<Self> {
        if pairs.len() > MAX_PLUG_PAIRS {
            return Err(RotorForgeError::Config(format!(
                "Plugboard can only have {} connections, found {}",
                MAX_PLUG_PAIRS,
                pairs.len()
            )));
        }

        let mut board = Self::default();
        for &(a, b) in pairs {
            if a as usize >= ALPHABET_SIZE || b as usize >= ALPHABET_SIZE {
                return Err(RotorForgeError::Config(format!(
                    "Plugboard pair ({}, {}) is outside the alphabet",
                    a, b
                )));
            }
            if a == b {
                return Err(RotorForgeError::Config(format!(
                    "Plugboard cannot connect '{}' to itself",
                    letter(a)
                )));
            }
            for c in [a, b] {
                if board.wiring[c as usize] != c {
                    return Err(RotorForgeError::Config(format!(
                        "Letter '{}' can only be plugged once",
                        letter(c)
                    )));
                }
            }
            board.wiring[a as usize] = b;
            board.wiring[b as usize] = a;
            board.pairs.push((a, b));
        }
        Ok(board)
    }

    #[inline(always)]
    pub fn substitute(&self, c: u8) -> u8 {
        self.wiring[c as usize]
    }

    pub fn pairs(&self) -> &[(u8, u8)] {
        &self.pairs
    }

    pub fn pair_strings(&self) -> Vec<String> {
        self.pairs
            .iter()
            .map(|&(a, b)| format!("{}{}", letter(a), letter(b)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn letter(c: u8) -> char {
    (b'A' + c) as char
}

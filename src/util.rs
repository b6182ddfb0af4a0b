use sha2::{Digest, Sha256};

/// Maps an ASCII letter of either case to 0..26.
#[inline(always)]
pub fn letter_index(c: char) -> Option<u8> {
    if c.is_ascii_alphabetic() {
        Some(c.to_ascii_uppercase() as u8 - b'A')
    } else {
        None
    }
}

/// Uppercases and keeps only the letters, as 0-based indices.
pub fn text_to_indices(text: &str) -> Vec<u8> {
    text.chars().filter_map(letter_index).collect()
}

pub fn indices_to_text(indices: &[u8]) -> String {
    indices.iter().map(|&c| (b'A' + c) as char).collect()
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

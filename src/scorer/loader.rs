use crate::error::{RfResult, RotorForgeError};
use crate::util::digest_bytes;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// N-gram counts exactly as read, in file order, plus a digest of the bytes.
pub struct RawNgramCounts {
    pub entries: Vec<(String, u64)>,
    pub digest: String,
}

/// Reads the whole file up front; the handle is closed before parsing.
pub fn load_ngram_file<P: AsRef<Path>>(path: P, separator: char) -> RfResult<RawNgramCounts> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        RotorForgeError::Resource(format!(
            "Could not open n-gram file at '{}': {}",
            path.display(),
            e
        ))
    })?;
    debug!("Read {} bytes of n-gram data from {:?}", bytes.len(), path);
    parse_ngram_counts(&bytes, separator)
}

pub fn load_ngram_counts<R: Read>(mut reader: R, separator: char) -> RfResult<RawNgramCounts> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_ngram_counts(&bytes, separator)
}

pub fn parse_ngram_counts(bytes: &[u8], separator: char) -> RfResult<RawNgramCounts> {
    if !separator.is_ascii() {
        return Err(RotorForgeError::Config(format!(
            "Separator '{}' must be a single ASCII character",
            separator
        )));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(separator as u8)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut entries = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = row_idx + 1;
        if rec.len() != 2 {
            return Err(RotorForgeError::Resource(format!(
                "Line {}: expected '<ngram>{}<count>', found {} fields",
                line,
                separator,
                rec.len()
            )));
        }

        let token = rec[0].to_ascii_uppercase();
        if token.is_empty() {
            return Err(RotorForgeError::Resource(format!(
                "Line {}: empty n-gram",
                line
            )));
        }

        let count: u64 = rec[1].parse().map_err(|_| {
            RotorForgeError::Resource(format!("Line {}: invalid count '{}'", line, &rec[1]))
        })?;
        if count == 0 {
            return Err(RotorForgeError::Resource(format!(
                "Line {}: count for '{}' must be positive",
                line, token
            )));
        }

        entries.push((token, count));
    }

    if entries.is_empty() {
        return Err(RotorForgeError::Resource(
            "N-gram table is empty".to_string(),
        ));
    }

    Ok(RawNgramCounts {
        entries,
        digest: digest_bytes(bytes),
    })
}

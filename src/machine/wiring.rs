use crate::consts::ALPHABET_SIZE;
use crate::error::{RfResult, RotorForgeError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[strum(ascii_case_insensitive)]
pub enum RotorKind {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    VIII,
    #[strum(serialize = "BETA")]
    Beta,
    #[strum(serialize = "GAMMA")]
    Gamma,
}

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(ascii_case_insensitive)]
pub enum ReflectorKind {
    #[strum(serialize = "UKW_A")]
    UkwA,
    #[strum(serialize = "UKW_B")]
    UkwB,
    #[strum(serialize = "UKW_C")]
    UkwC,
    #[strum(serialize = "UKW_B_THIN")]
    UkwBThin,
    #[strum(serialize = "UKW_C_THIN")]
    UkwCThin,
}

/// Preset rotor pools offered to the cryptanalysis front end.
#[derive(
    Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum RotorPool {
    /// Army and air force issue, rotors I to V.
    Standard5,
    /// Naval issue, rotors I to VIII.
    Naval8,
}

impl RotorPool {
    pub fn kinds(&self) -> Vec<RotorKind> {
        let count = match self {
            Self::Standard5 => 5,
            Self::Naval8 => 8,
        };
        RotorKind::iter().take(count).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.kinds().iter().map(|k| k.to_string()).collect()
    }
}

/// Immutable wiring and notch data for one rotor type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorSpec {
    pub name: String,
    pub forward: [u8; ALPHABET_SIZE],
    pub backward: [u8; ALPHABET_SIZE],
    notches: Vec<u8>,
    notch_mask: [bool; ALPHABET_SIZE],
}

impl RotorSpec {
    /// Builds a rotor from a 26-letter wiring string and a string of notch
    /// letters (empty for rotors that never carry).
    pub fn custom(name: &str, wiring: &str, notches: &str) -> RfResult<Self> {
        let forward = parse_permutation(name, wiring)?;
        let mut notch_indices = Vec::new();
        for ch in notches.chars() {
            if !ch.is_ascii_alphabetic() {
                return Err(RotorForgeError::Config(format!(
                    "Rotor '{}' has an invalid notch '{}'",
                    name, ch
                )));
            }
            notch_indices.push(ch.to_ascii_uppercase() as u8 - b'A');
        }
        Ok(Self::from_table(name, forward, &notch_indices))
    }

    fn from_table(name: &str, forward: [u8; ALPHABET_SIZE], notches: &[u8]) -> Self {
        let mut backward = [0u8; ALPHABET_SIZE];
        for (i, &out) in forward.iter().enumerate() {
            backward[out as usize] = i as u8;
        }
        let mut notch_mask = [false; ALPHABET_SIZE];
        for &n in notches {
            notch_mask[n as usize] = true;
        }
        Self {
            name: name.to_string(),
            forward,
            backward,
            notches: notches.to_vec(),
            notch_mask,
        }
    }

    /// Notch positions as 0-based letter indices.
    pub fn notches(&self) -> &[u8] {
        &self.notches
    }

    #[inline(always)]
    pub fn is_notch(&self, position: u8) -> bool {
        self.notch_mask[position as usize]
    }
}

/// Immutable wiring for one reflector type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectorSpec {
    pub name: String,
    pub wiring: [u8; ALPHABET_SIZE],
    pub thin: bool,
}

impl ReflectorSpec {
    /// Builds a reflector from a 26-letter wiring string. The wiring only has
    /// to be a permutation; it is not required to be an involution.
    pub fn custom(name: &str, wiring: &str, thin: bool) -> RfResult<Self> {
        Ok(Self {
            name: name.to_string(),
            wiring: parse_permutation(name, wiring)?,
            thin,
        })
    }

    #[inline(always)]
    pub fn reflect(&self, c: u8) -> u8 {
        self.wiring[c as usize]
    }

    /// True when the wiring pairs letters up with no letter mapped to itself.
    pub fn is_historic_involution(&self) -> bool {
        self.wiring
            .iter()
            .enumerate()
            .all(|(i, &o)| o as usize != i && self.wiring[o as usize] as usize == i)
    }
}

fn parse_permutation(name: &str, wiring: &str) -> RfResult<[u8; ALPHABET_SIZE]> {
    let bytes = wiring.as_bytes();
    if bytes.len() != ALPHABET_SIZE {
        return Err(RotorForgeError::Config(format!(
            "Wiring for '{}' must have {} letters, found {}",
            name,
            ALPHABET_SIZE,
            bytes.len()
        )));
    }
    let mut table = [0u8; ALPHABET_SIZE];
    let mut seen = [false; ALPHABET_SIZE];
    for (i, &b) in bytes.iter().enumerate() {
        if !b.is_ascii_alphabetic() {
            return Err(RotorForgeError::Config(format!(
                "Wiring for '{}' contains non-letter '{}'",
                name, b as char
            )));
        }
        let idx = b.to_ascii_uppercase() - b'A';
        if seen[idx as usize] {
            return Err(RotorForgeError::Config(format!(
                "Wiring for '{}' is not a permutation ('{}' repeated)",
                name,
                (idx + b'A') as char
            )));
        }
        seen[idx as usize] = true;
        table[i] = idx;
    }
    Ok(table)
}

fn letters(s: &str) -> [u8; ALPHABET_SIZE] {
    let mut out = [0u8; ALPHABET_SIZE];
    for (o, b) in out.iter_mut().zip(s.bytes()) {
        *o = b - b'A';
    }
    out
}

impl RotorKind {
    fn table(&self) -> (&'static str, &'static str) {
        match self {
            Self::I => ("EKMFLGDQVZNTOWYHXUSPAIBRCJ", "Q"),
            Self::II => ("AJDKSIRUXBLHWTMCQGZNPYFVOE", "E"),
            Self::III => ("BDFHJLCPRTXVZNYEIWGAKMUSQO", "V"),
            Self::IV => ("ESOVPZJAYQUIRHXLNFTGKDCMWB", "J"),
            Self::V => ("VZBRGITYUPSDNHLXAWMJQOFECK", "Z"),
            Self::VI => ("JPGVOUMFYQBENHZRDKASXLICTW", "MZ"),
            Self::VII => ("NZJHGRCXMYSWBOUFAIVLPEKQDT", "MZ"),
            Self::VIII => ("FKQHTLXOCBJSPDZRAMEWNIUYGV", "MZ"),
            Self::Beta => ("LEYJVCNIXWPBQMDRTAKZGFUHOS", ""),
            Self::Gamma => ("FSOKANUERHMBTIYCWLQPZXVGJD", ""),
        }
    }

    /// Resolves a catalogue name such as `"III"` or `"beta"`.
    pub fn from_name(name: &str) -> RfResult<Self> {
        Self::from_str(name.trim())
            .map_err(|_| RotorForgeError::Config(format!("Unknown rotor '{}'", name)))
    }

    /// The thin-machine rotors that only fit the leftmost slot.
    pub fn is_extra(&self) -> bool {
        matches!(self, Self::Beta | Self::Gamma)
    }

    pub fn spec(&self) -> &'static RotorSpec {
        &rotor_catalogue()[*self as usize]
    }
}

impl ReflectorKind {
    fn table(&self) -> &'static str {
        match self {
            Self::UkwA => "EJMZALYXVBWFCRQUONTSPIKHGD",
            Self::UkwB => "YRUHQSLDPXNGOKMIEBFZCWVJAT",
            Self::UkwC => "FVPJIAOYEDRZXWGCTKUQSBNMHL",
            Self::UkwBThin => "ENKQAUYWJICOPBLMDXZVFTHRGS",
            Self::UkwCThin => "RDOBJNTKVEHMLFCWZAXGYIPSUQ",
        }
    }

    pub fn from_name(name: &str) -> RfResult<Self> {
        Self::from_str(name.trim())
            .map_err(|_| RotorForgeError::Config(format!("Unknown reflector '{}'", name)))
    }

    pub fn is_thin(&self) -> bool {
        matches!(self, Self::UkwBThin | Self::UkwCThin)
    }

    pub fn spec(&self) -> &'static ReflectorSpec {
        &reflector_catalogue()[*self as usize]
    }
}

fn rotor_catalogue() -> &'static [RotorSpec] {
    static ROTORS: OnceLock<Vec<RotorSpec>> = OnceLock::new();
    ROTORS.get_or_init(|| {
        RotorKind::iter()
            .map(|kind| {
                let (wiring, notches) = kind.table();
                let notch_idx: Vec<u8> = notches.bytes().map(|b| b - b'A').collect();
                RotorSpec::from_table(&kind.to_string(), letters(wiring), &notch_idx)
            })
            .collect()
    })
}

fn reflector_catalogue() -> &'static [ReflectorSpec] {
    static REFLECTORS: OnceLock<Vec<ReflectorSpec>> = OnceLock::new();
    REFLECTORS.get_or_init(|| {
        ReflectorKind::iter()
            .map(|kind| ReflectorSpec {
                name: kind.to_string(),
                wiring: letters(kind.table()),
                thin: kind.is_thin(),
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_inverts_forward() {
        for kind in RotorKind::iter() {
            let spec = kind.spec();
            for x in 0..ALPHABET_SIZE {
                assert_eq!(spec.forward[spec.backward[x] as usize] as usize, x);
            }
        }
    }

    #[test]
    fn test_catalogue_reflectors_are_involutions() {
        for kind in ReflectorKind::iter() {
            assert!(kind.spec().is_historic_involution(), "{}", kind);
        }
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        assert_eq!(RotorKind::from_name("beta").unwrap(), RotorKind::Beta);
        assert_eq!(RotorKind::from_name(" vi ").unwrap(), RotorKind::VI);
        assert_eq!(
            ReflectorKind::from_name("ukw_b_thin").unwrap(),
            ReflectorKind::UkwBThin
        );
        assert!(RotorKind::from_name("IX").is_err());
    }

    #[test]
    fn test_double_notch_rotors() {
        let spec = RotorKind::VII.spec();
        assert_eq!(spec.notches(), &[12, 25]);
        assert!(spec.is_notch(12) && spec.is_notch(25));
        assert!(RotorKind::Gamma.spec().notches().is_empty());
    }

    #[test]
    fn test_custom_wiring_rejects_repeats() {
        let err = RotorSpec::custom("X", "AACDEFGHIJKLMNOPQRSTUVWXYZ", "").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_pools() {
        assert_eq!(RotorPool::Standard5.names(), vec!["I", "II", "III", "IV", "V"]);
        assert_eq!(RotorPool::Naval8.kinds().len(), 8);
        assert_eq!("naval8".parse::<RotorPool>().unwrap(), RotorPool::Naval8);
    }
}

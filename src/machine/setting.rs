use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rotor position or ring setting as a user writes it: `17` or `Q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Number(i32),
    Letter(char),
}

impl Setting {
    /// 1-based value; letters map A=1 .. Z=26. Non-letters map to 0 so that
    /// range validation rejects them.
    pub fn value(&self) -> i32 {
        match *self {
            Self::Number(n) => n,
            Self::Letter(c) if c.is_ascii_alphabetic() => {
                (c.to_ascii_uppercase() as u8 - b'A') as i32 + 1
            }
            Self::Letter(_) => 0,
        }
    }

    /// 0-based index, or `None` when outside 1..=26.
    pub fn to_index(&self) -> Option<u8> {
        let v = self.value();
        if (1..=26).contains(&v) {
            Some((v - 1) as u8)
        } else {
            None
        }
    }
}

impl From<i32> for Setting {
    fn from(n: i32) -> Self {
        Self::Number(n)
    }
}

impl From<char> for Setting {
    fn from(c: char) -> Self {
        Self::Letter(c)
    }
}

impl FromStr for Setting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i32>() {
            return Ok(Self::Number(n));
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(Self::Letter(c.to_ascii_uppercase())),
            _ => Err(format!("'{}' is neither a number nor a single letter", s)),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Letter(c) => write!(f, "{}", c),
        }
    }
}

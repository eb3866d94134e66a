//! Conversion of text between writing schemes.
//!
//! The pipeline only needs Latin names in Devanagari. It talks to a
//! [`Transliterator`] so a fuller engine can stand in for the built-in
//! [`Itrans`] one.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod itrans;

pub use self::itrans::Itrans;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// ASCII romanisation of Devanagari.
    Itrans,
    Devanagari,
}

impl Scheme {
    pub const fn name(self) -> &'static str {
        match self {
            Scheme::Itrans => "itrans",
            Scheme::Devanagari => "devanagari",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = TransliterationError;

    fn from_str(s: &str) -> Result<Scheme, TransliterationError> {
        match s.to_ascii_lowercase().as_str() {
            "itrans" => Ok(Scheme::Itrans),
            "devanagari" => Ok(Scheme::Devanagari),
            _ => Err(TransliterationError::UnknownScheme(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransliterationError {
    #[error("cannot transliterate from {from} to {to}")]
    Unsupported { from: Scheme, to: Scheme },

    #[error("unknown scheme '{0}'")]
    UnknownScheme(String),
}

pub trait Transliterator {
    /// Rewrites `text` from one scheme into another. Text already in the
    /// target scheme comes back unchanged.
    fn transliterate(&self, text: &str, from: Scheme, to: Scheme)
        -> Result<String, TransliterationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_names() {
        assert_eq!("itrans".parse::<Scheme>().unwrap(), Scheme::Itrans);
        assert_eq!("Devanagari".parse::<Scheme>().unwrap(), Scheme::Devanagari);
        assert!("iast".parse::<Scheme>().is_err());
        assert_eq!(Scheme::Itrans.to_string(), "itrans");
    }
}

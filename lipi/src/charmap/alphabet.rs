//! Languages and the ordered alphabets that identify them.
use std::fmt;
use std::str::FromStr;

use language_tags::LanguageTag;
use serde::{Deserialize, Serialize};

/// Number of letters in every Indic alphabet. Each one covers its Unicode
/// block from the second code point onwards, which keeps positions aligned
/// across scripts.
pub const INDIC_ALPHABET_LEN: u32 = 127;

/// A language whose alphabet is known to the character map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "hi_IN")]
    Hindi,
    #[serde(rename = "bn_IN")]
    Bengali,
    #[serde(rename = "pa_IN")]
    Punjabi,
    #[serde(rename = "gu_IN")]
    Gujarati,
    #[serde(rename = "or_IN")]
    Oriya,
    #[serde(rename = "ta_IN")]
    Tamil,
    #[serde(rename = "te_IN")]
    Telugu,
    #[serde(rename = "kn_IN")]
    Kannada,
    #[serde(rename = "ml_IN")]
    Malayalam,
    #[serde(rename = "en_US")]
    English,
}

impl Language {
    /// All languages in declaration order.
    pub const ALL: [Language; 10] = [
        Language::Hindi,
        Language::Bengali,
        Language::Punjabi,
        Language::Gujarati,
        Language::Oriya,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Malayalam,
        Language::English,
    ];

    /// The locale-style tag, e.g. `hi_IN`.
    pub const fn tag(self) -> &'static str {
        match self {
            Language::Hindi => "hi_IN",
            Language::Bengali => "bn_IN",
            Language::Punjabi => "pa_IN",
            Language::Gujarati => "gu_IN",
            Language::Oriya => "or_IN",
            Language::Tamil => "ta_IN",
            Language::Telugu => "te_IN",
            Language::Kannada => "kn_IN",
            Language::Malayalam => "ml_IN",
            Language::English => "en_US",
        }
    }

    #[inline(always)]
    fn primary_subtag(self) -> &'static str {
        &self.tag()[..2]
    }

    #[inline(always)]
    fn region(self) -> &'static str {
        &self.tag()[3..]
    }

    #[inline(always)]
    pub fn is_latin(self) -> bool {
        self == Language::English
    }

    #[inline(always)]
    pub fn is_indic(self) -> bool {
        !self.is_latin()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LanguageParseError {
    #[error("invalid language tag '{0}': {1}")]
    Invalid(String, String),

    #[error("unsupported language '{0}'")]
    Unsupported(String),
}

impl FromStr for Language {
    type Err = LanguageParseError;

    /// Accepts the locale-style tags (`hi_IN`) as well as BCP 47 tags
    /// (`hi-IN`, `hi`). A region, when given, has to match.
    fn from_str(s: &str) -> Result<Language, LanguageParseError> {
        if let Some(lang) = Language::ALL.iter().find(|l| l.tag() == s) {
            return Ok(*lang);
        }

        let tag = LanguageTag::parse(&s.replace('_', "-"))
            .map_err(|e| LanguageParseError::Invalid(s.to_string(), e.to_string()))?;
        let primary = tag.primary_language().to_ascii_lowercase();

        Language::ALL
            .iter()
            .copied()
            .find(|l| {
                l.primary_subtag() == primary
                    && tag
                        .region()
                        .map_or(true, |r| r.eq_ignore_ascii_case(l.region()))
            })
            .ok_or_else(|| LanguageParseError::Unsupported(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Letters {
    /// A run of consecutive code points.
    Block { first: u32, len: u32 },
    Listed(&'static str),
}

/// The ordered letters of one language. Order carries meaning: the position
/// of a letter is what the soundex tables are indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    language: Language,
    letters: Letters,
}

impl Alphabet {
    /// `len` code points starting at `first`, cut short at the end of the
    /// Unicode range. Surrogates inside the block keep their positions but
    /// are not letters.
    pub const fn block(language: Language, first: char, len: u32) -> Alphabet {
        let first = first as u32;
        let room = char::MAX as u32 - first + 1;
        Alphabet {
            language,
            letters: Letters::Block {
                first,
                len: if len < room { len } else { room },
            },
        }
    }

    pub const fn listed(language: Language, letters: &'static str) -> Alphabet {
        Alphabet {
            language,
            letters: Letters::Listed(letters),
        }
    }

    #[inline(always)]
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn len(&self) -> usize {
        match self.letters {
            Letters::Block { len, .. } => len as usize,
            Letters::Listed(s) => s.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Letters in alphabet order, with their positions.
    pub fn chars(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index).map(|c| (index, c)))
    }

    pub fn get(&self, index: usize) -> Option<char> {
        match self.letters {
            Letters::Block { first, len } if index < len as usize => {
                char::from_u32(first + index as u32)
            }
            Letters::Block { .. } => None,
            Letters::Listed(s) => s.chars().nth(index),
        }
    }

    /// Linear scan for `c`. [`CharMap`](super::CharMap) keeps an index so
    /// lookups never need this.
    pub fn position(&self, c: char) -> Option<usize> {
        match self.letters {
            Letters::Block { first, len } => (c as u32)
                .checked_sub(first)
                .filter(|offset| *offset < len)
                .map(|offset| offset as usize),
            Letters::Listed(s) => s.chars().position(|x| x == c),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.position(c).is_some()
    }
}

/// The built-in alphabets in declaration order.
pub static ALPHABETS: [Alphabet; 10] = [
    Alphabet::block(Language::Hindi, '\u{0901}', INDIC_ALPHABET_LEN),
    Alphabet::block(Language::Bengali, '\u{0981}', INDIC_ALPHABET_LEN),
    Alphabet::block(Language::Punjabi, '\u{0A01}', INDIC_ALPHABET_LEN),
    Alphabet::block(Language::Gujarati, '\u{0A81}', INDIC_ALPHABET_LEN),
    Alphabet::block(Language::Oriya, '\u{0B01}', INDIC_ALPHABET_LEN),
    Alphabet::block(Language::Tamil, '\u{0B81}', INDIC_ALPHABET_LEN),
    Alphabet::block(Language::Telugu, '\u{0C01}', INDIC_ALPHABET_LEN),
    Alphabet::block(Language::Kannada, '\u{0C81}', INDIC_ALPHABET_LEN),
    Alphabet::block(Language::Malayalam, '\u{0D01}', INDIC_ALPHABET_LEN),
    Alphabet::listed(Language::English, "abcdefghijklmnopqrstuvwxyz"),
];

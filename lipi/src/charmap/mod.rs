//! Classifies characters by the alphabet that contains them.
//!
//! The alphabets are fixed data. Lookups go through an inverse index from
//! character to `(language, position)` that is built once, so classification
//! does not depend on table iteration order: when two alphabets share a
//! character, the one declared first wins.
use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

mod alphabet;

pub use self::alphabet::{Alphabet, Language, LanguageParseError, ALPHABETS, INDIC_ALPHABET_LEN};

/// Outcome of comparing two characters through their alphabets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharComparison {
    /// The characters are the same.
    Identical,
    /// Different characters at the same position of their alphabets, e.g.
    /// the same letter written in two Indic scripts.
    Equivalent,
    Different,
    /// At least one of the characters is in no known alphabet.
    NotFound,
}

#[derive(Debug)]
pub struct CharMap {
    alphabets: Vec<Alphabet>,
    index: HashMap<char, (Language, usize)>,
}

static BUILTIN: Lazy<CharMap> = Lazy::new(|| CharMap::new(&ALPHABETS));

impl CharMap {
    pub fn new(alphabets: &[Alphabet]) -> CharMap {
        let mut index = HashMap::with_capacity(alphabets.iter().map(Alphabet::len).sum());

        for alphabet in alphabets {
            let language = alphabet.language();
            for (position, c) in alphabet.chars() {
                match index.get(&c) {
                    Some(&(owner, _)) => {
                        log::warn!(
                            "{:?} is in both {} and {}; keeping {}",
                            c,
                            owner,
                            language,
                            owner
                        );
                    }
                    None => {
                        index.insert(c, (language, position));
                    }
                }
            }
        }

        log::debug!(
            "Built character index: {} alphabets, {} characters",
            alphabets.len(),
            index.len()
        );

        CharMap {
            alphabets: alphabets.to_vec(),
            index,
        }
    }

    /// The map over the built-in alphabets.
    pub fn builtin() -> &'static CharMap {
        &BUILTIN
    }

    #[inline(always)]
    pub fn alphabets(&self) -> &[Alphabet] {
        &self.alphabets
    }

    pub fn alphabet(&self, language: Language) -> Option<&Alphabet> {
        self.alphabets.iter().find(|a| a.language() == language)
    }

    #[inline]
    pub fn position(&self, c: char) -> Option<(Language, usize)> {
        self.index.get(&c).copied()
    }

    #[inline]
    pub fn language(&self, c: char) -> Option<Language> {
        self.position(c).map(|(language, _)| language)
    }

    pub fn compare(&self, a: char, b: char) -> CharComparison {
        if a == b {
            return CharComparison::Identical;
        }

        match (self.position(a), self.position(b)) {
            (Some((_, x)), Some((_, y))) if x == y => CharComparison::Equivalent,
            (Some(_), Some(_)) => CharComparison::Different,
            _ => CharComparison::NotFound,
        }
    }
}

/// Language of `c` according to the built-in alphabets.
#[inline]
pub fn language(c: char) -> Option<Language> {
    BUILTIN.language(c)
}

#[inline]
pub fn position(c: char) -> Option<(Language, usize)> {
    BUILTIN.position(c)
}

#[inline]
pub fn compare(a: char, b: char) -> CharComparison {
    BUILTIN.compare(a, b)
}

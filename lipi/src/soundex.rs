//! Soundex codes that stay comparable across Indic scripts.
//!
//! Every letter maps to a coarse phonetic class. Indic letters share one
//! table because their alphabets are laid out alike, so `रमेश` and `ரமேஷ`
//! reduce to the same classes. Latin letters use the classic soundex digits.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::case_handling::{first_char_lower, lower_case};
use crate::charmap::{self, Language};

/// Phonetic class of each Latin letter, `a` to `z`.
pub const LATIN_SOUNDEX: &[u8; 26] = b"01230120022455012623010202";

/// Phonetic class of each Indic alphabet position.
pub const INDIC_SOUNDEX: &[u8; 127] = b"0N00AABBCCPQ0DDDEEEEFFFFGHHHHGIIIIJKKKKLLMMMMNOPPQQQRSSST0000ABBCCPPEDDDDEEE0000000000E00000000PQQQ0001234567890000000000JJQPPF";

/// The class that carries no sound and is dropped from codes.
pub const SILENT: char = '0';

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundexConfig {
    /// Length of Indic codes, and of Latin codes when `fixed_length_latin`
    /// is set.
    pub length: usize,
    /// Pad and truncate codes of Latin names too. Off by default: Latin codes
    /// keep whatever length the name produces.
    #[serde(default)]
    pub fixed_length_latin: bool,
}

impl SoundexConfig {
    pub const fn default() -> SoundexConfig {
        SoundexConfig {
            length: 8,
            fixed_length_latin: false,
        }
    }
}

/// How two names relate phonetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameComparison {
    Identical,
    /// Same code, both names start in the same language.
    SameLanguage,
    /// Same code, written in different Indic scripts.
    CrossLanguage,
    Different,
    /// One name is Latin and the other is not; their codes come from
    /// different tables.
    Incomparable,
}

/// Phonetic class of a single character, [`SILENT`] when unknown.
pub fn soundex_code(c: char) -> char {
    let class = match charmap::position(c) {
        Some((Language::English, i)) => LATIN_SOUNDEX.get(i),
        Some((_, i)) => INDIC_SOUNDEX.get(i),
        None => None,
    };

    class.map(|&b| b as char).unwrap_or(SILENT)
}

#[inline]
pub fn soundex(name: &str) -> SmolStr {
    soundex_with_config(name, &SoundexConfig::default())
}

pub fn soundex_with_config(name: &str, config: &SoundexConfig) -> SmolStr {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return SmolStr::default(),
    };

    let classes = lower_case(chars.as_str())
        .chars()
        .map(soundex_code)
        .filter(|&c| c != SILENT)
        .dedup()
        .collect::<Vec<char>>();

    let mut code = String::with_capacity(config.length.max(classes.len() + 1) * 4);
    code.push(first);

    let is_latin = first_char_lower(name).and_then(charmap::language) == Some(Language::English);
    if is_latin && !config.fixed_length_latin {
        code.extend(classes);
        return SmolStr::from(code);
    }

    code.extend(
        classes
            .into_iter()
            .chain(std::iter::repeat(SILENT))
            .take(config.length.saturating_sub(1)),
    );
    if config.length == 0 {
        code.clear();
    }

    log::trace!("soundex: {} -> {}", name, code);
    SmolStr::from(code)
}

/// Compares two names by their codes, ignoring the first character so that
/// the same name in two scripts can match.
pub fn compare(a: &str, b: &str) -> NameComparison {
    if a == b {
        return NameComparison::Identical;
    }

    let lang_a = first_char_lower(a).and_then(charmap::language);
    let lang_b = first_char_lower(b).and_then(charmap::language);

    let is_latin = |l: Option<Language>| l == Some(Language::English);
    if is_latin(lang_a) != is_latin(lang_b) {
        return NameComparison::Incomparable;
    }

    let code_a = soundex(a);
    let code_b = soundex(b);

    if tail(&code_a) != tail(&code_b) {
        return NameComparison::Different;
    }

    if lang_a == lang_b {
        NameComparison::SameLanguage
    } else {
        NameComparison::CrossLanguage
    }
}

#[inline(always)]
fn tail(code: &str) -> &str {
    let mut chars = code.chars();
    chars.next();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables() {
        assert_eq!(LATIN_SOUNDEX.len(), 26);
        assert!(LATIN_SOUNDEX.iter().all(|b| b.is_ascii_digit()));
        assert_eq!(INDIC_SOUNDEX.len(), crate::charmap::INDIC_ALPHABET_LEN as usize);
        assert!(INDIC_SOUNDEX.iter().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn codes() {
        assert_eq!(soundex_code('b'), '1');
        assert_eq!(soundex_code('r'), '6');
        assert_eq!(soundex_code('a'), '0');
        assert_eq!(soundex_code('क'), 'F');
        assert_eq!(soundex_code('க'), 'F');
        assert_eq!(soundex_code('म'), 'N');
        assert_eq!(soundex_code('्'), '0');
        assert_eq!(soundex_code('३'), '3');
        assert_eq!(soundex_code('B'), '0');
        assert_eq!(soundex_code('€'), '0');
    }

    #[test]
    fn indic_names_are_padded() {
        assert_eq!(soundex("रमेश"), "रNDS0000");
        assert_eq!(soundex("क"), "क0000000");
        assert_eq!(
            soundex_with_config("रमेश", &SoundexConfig { length: 3, ..SoundexConfig::default() }),
            "रND"
        );
        assert_eq!(
            soundex_with_config("रमेश", &SoundexConfig { length: 12, ..SoundexConfig::default() }),
            "रNDS00000000"
        );
    }

    #[test]
    fn latin_names_keep_their_length() {
        assert_eq!(soundex("robert"), "r163");
        assert_eq!(soundex("rupert"), "r163");
        assert_eq!(soundex("Robert"), "R163");
        assert_eq!(soundex("a"), "a");

        let cfg = SoundexConfig {
            length: 4,
            fixed_length_latin: true,
        };
        assert_eq!(soundex_with_config("ashcraft", &cfg), "a261");
        assert_eq!(soundex_with_config("lee", &cfg), "l000");
    }

    #[test]
    fn collapses_after_dropping_silent_classes() {
        // b and p share a class; the vowel between them is dropped first.
        assert_eq!(soundex("abap"), "a1");
        assert_eq!(soundex("tymczak"), "t52");
    }

    #[test]
    fn rest_of_name_is_lower_cased() {
        assert_eq!(soundex("rOBERT"), soundex("robert"));
    }

    #[test]
    fn empty_and_unknown() {
        assert_eq!(soundex(""), "");
        assert_eq!(soundex("€€"), "€0000000");
        assert_eq!(
            soundex_with_config("रमेश", &SoundexConfig { length: 0, ..SoundexConfig::default() }),
            ""
        );
    }

    #[test]
    fn compare_names() {
        assert_eq!(compare("रमेश", "रमेश"), NameComparison::Identical);
        assert_eq!(compare("robert", "rupert"), NameComparison::SameLanguage);
        assert_eq!(compare("रमेश", "ரமேஷ"), NameComparison::CrossLanguage);
        assert_eq!(compare("रमेश", "सुरेश"), NameComparison::Different);
        assert_eq!(compare("ramesh", "रमेश"), NameComparison::Incomparable);
    }
}

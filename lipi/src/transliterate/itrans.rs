use hashbrown::HashMap;

use super::{Scheme, TransliterationError, Transliterator};

const VIRAMA: char = '\u{094D}';

/// Longest ITRANS token, in characters.
const MAX_TOKEN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// Independent vowel and the sign it takes after a consonant. The
    /// inherent `a` has no sign.
    Vowel(char, Option<char>),
    Consonant(&'static str),
    /// Emitted as is; closes a pending consonant with a virama.
    Symbol(&'static str),
}

use self::Token::*;

static TOKENS: &[(&str, Token)] = &[
    ("a", Vowel('अ', None)),
    ("aa", Vowel('आ', Some('ा'))),
    ("A", Vowel('आ', Some('ा'))),
    ("i", Vowel('इ', Some('ि'))),
    ("ii", Vowel('ई', Some('ी'))),
    ("I", Vowel('ई', Some('ी'))),
    ("ee", Vowel('ई', Some('ी'))),
    ("u", Vowel('उ', Some('ु'))),
    ("uu", Vowel('ऊ', Some('ू'))),
    ("U", Vowel('ऊ', Some('ू'))),
    ("oo", Vowel('ऊ', Some('ू'))),
    ("RRi", Vowel('ऋ', Some('ृ'))),
    ("R^i", Vowel('ऋ', Some('ृ'))),
    ("RRI", Vowel('ॠ', Some('ॄ'))),
    ("R^I", Vowel('ॠ', Some('ॄ'))),
    ("LLi", Vowel('ऌ', Some('ॢ'))),
    ("L^i", Vowel('ऌ', Some('ॢ'))),
    ("LLI", Vowel('ॡ', Some('ॣ'))),
    ("L^I", Vowel('ॡ', Some('ॣ'))),
    ("e", Vowel('ए', Some('े'))),
    ("ai", Vowel('ऐ', Some('ै'))),
    ("o", Vowel('ओ', Some('ो'))),
    ("au", Vowel('औ', Some('ौ'))),
    ("k", Consonant("क")),
    ("kh", Consonant("ख")),
    ("g", Consonant("ग")),
    ("gh", Consonant("घ")),
    ("~N", Consonant("ङ")),
    ("N^", Consonant("ङ")),
    ("ch", Consonant("च")),
    ("c", Consonant("च")),
    ("Ch", Consonant("छ")),
    ("chh", Consonant("छ")),
    ("C", Consonant("छ")),
    ("j", Consonant("ज")),
    ("jh", Consonant("झ")),
    ("~n", Consonant("ञ")),
    ("JN", Consonant("ञ")),
    ("T", Consonant("ट")),
    ("Th", Consonant("ठ")),
    ("D", Consonant("ड")),
    ("Dh", Consonant("ढ")),
    ("N", Consonant("ण")),
    ("t", Consonant("त")),
    ("th", Consonant("थ")),
    ("d", Consonant("द")),
    ("dh", Consonant("ध")),
    ("n", Consonant("न")),
    ("p", Consonant("प")),
    ("ph", Consonant("फ")),
    ("b", Consonant("ब")),
    ("bh", Consonant("भ")),
    ("m", Consonant("म")),
    ("y", Consonant("य")),
    ("r", Consonant("र")),
    ("l", Consonant("ल")),
    ("v", Consonant("व")),
    ("w", Consonant("व")),
    ("sh", Consonant("श")),
    ("Sh", Consonant("ष")),
    ("shh", Consonant("ष")),
    ("S", Consonant("ष")),
    ("s", Consonant("स")),
    ("h", Consonant("ह")),
    ("L", Consonant("ळ")),
    ("kSh", Consonant("क्ष")),
    ("kS", Consonant("क्ष")),
    ("x", Consonant("क्ष")),
    ("j~n", Consonant("ज्ञ")),
    ("GY", Consonant("ज्ञ")),
    ("dny", Consonant("ज्ञ")),
    ("q", Consonant("क\u{093C}")),
    ("K", Consonant("ख\u{093C}")),
    ("G", Consonant("ग\u{093C}")),
    ("z", Consonant("ज\u{093C}")),
    ("f", Consonant("फ\u{093C}")),
    (".D", Consonant("ड\u{093C}")),
    (".Dh", Consonant("ढ\u{093C}")),
    ("Y", Consonant("य\u{093C}")),
    ("M", Symbol("ं")),
    (".m", Symbol("ं")),
    (".n", Symbol("ं")),
    ("H", Symbol("ः")),
    (".N", Symbol("ँ")),
    (".a", Symbol("ऽ")),
    ("OM", Symbol("ॐ")),
    ("AUM", Symbol("ॐ")),
    ("|", Symbol("।")),
    ("||", Symbol("॥")),
    ("0", Symbol("०")),
    ("1", Symbol("१")),
    ("2", Symbol("२")),
    ("3", Symbol("३")),
    ("4", Symbol("४")),
    ("5", Symbol("५")),
    ("6", Symbol("६")),
    ("7", Symbol("७")),
    ("8", Symbol("८")),
    ("9", Symbol("९")),
];

/// ITRANS to Devanagari, by greedy longest match.
///
/// A consonant takes the sign of the vowel that follows it, or a virama when
/// no vowel follows, so `ramesh` becomes `रमेश्`. Anything that is not an
/// ITRANS token is copied through.
#[derive(Debug, Clone)]
pub struct Itrans {
    tokens: HashMap<&'static str, Token>,
}

impl Default for Itrans {
    fn default() -> Self {
        Itrans::new()
    }
}

impl Itrans {
    pub fn new() -> Itrans {
        Itrans {
            tokens: TOKENS.iter().copied().collect(),
        }
    }

    /// Longest token at the start of `input`, with its length in bytes.
    fn next_token(&self, input: &str) -> Option<(Token, usize)> {
        let ends = input
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .chain(std::iter::once(input.len()))
            .take(MAX_TOKEN_LEN)
            .collect::<Vec<_>>();

        ends.into_iter()
            .rev()
            .find_map(|end| self.tokens.get(&input[..end]).map(|t| (*t, end)))
    }

    pub fn to_devanagari(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 3);
        let mut pending_consonant = false;
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            match self.next_token(rest) {
                Some((Vowel(independent, sign), len)) => {
                    if pending_consonant {
                        out.extend(sign);
                    } else {
                        out.push(independent);
                    }
                    pending_consonant = false;
                    rest = &rest[len..];
                }
                Some((Consonant(letter), len)) => {
                    if pending_consonant {
                        out.push(VIRAMA);
                    }
                    out.push_str(letter);
                    pending_consonant = true;
                    rest = &rest[len..];
                }
                Some((Symbol(symbol), len)) => {
                    if pending_consonant {
                        out.push(VIRAMA);
                    }
                    out.push_str(symbol);
                    pending_consonant = false;
                    rest = &rest[len..];
                }
                None => {
                    if pending_consonant {
                        out.push(VIRAMA);
                    }
                    out.push(c);
                    pending_consonant = false;
                    rest = &rest[c.len_utf8()..];
                }
            }
        }

        if pending_consonant {
            out.push(VIRAMA);
        }

        log::trace!("itrans: {} -> {}", text, out);
        out
    }
}

impl Transliterator for Itrans {
    fn transliterate(
        &self,
        text: &str,
        from: Scheme,
        to: Scheme,
    ) -> Result<String, TransliterationError> {
        match (from, to) {
            (from, to) if from == to => Ok(text.to_string()),
            (Scheme::Itrans, Scheme::Devanagari) => Ok(self.to_devanagari(text)),
            (from, to) => Err(TransliterationError::Unsupported { from, to }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(s: &str) -> String {
        Itrans::new().to_devanagari(s)
    }

    #[test]
    fn vowels() {
        assert_eq!(dev("a"), "अ");
        assert_eq!(dev("aa"), "आ");
        assert_eq!(dev("A"), "आ");
        assert_eq!(dev("ai"), "ऐ");
        assert_eq!(dev("au"), "औ");
        assert_eq!(dev("RRi"), "ऋ");
        assert_eq!(dev("aaii"), "आई");
    }

    #[test]
    fn consonant_vowel_pairs() {
        assert_eq!(dev("ka"), "क");
        assert_eq!(dev("kaa"), "का");
        assert_eq!(dev("ki"), "कि");
        assert_eq!(dev("kai"), "कै");
        assert_eq!(dev("kRRi"), "कृ");
        assert_eq!(dev("bhaarata"), "भारत");
    }

    #[test]
    fn names() {
        assert_eq!(dev("ramesh"), "रमेश्");
        assert_eq!(dev("deepak"), "दीपक्");
        assert_eq!(dev("seetaa"), "सीता");
        assert_eq!(dev("sunitaa"), "सुनिता");
        assert_eq!(dev("krishna"), "क्रिश्न");
        assert_eq!(dev("lakShmii"), "लक्ष्मी");
    }

    #[test]
    fn longest_match_wins() {
        assert_eq!(dev("chh"), "छ्");
        assert_eq!(dev("cha"), "च");
        assert_eq!(dev("xa"), "क्ष");
        assert_eq!(dev("GYaana"), "ज्ञान");
    }

    #[test]
    fn symbols_close_consonants() {
        assert_eq!(dev("aM"), "अं");
        assert_eq!(dev("kaM"), "कं");
        assert_eq!(dev("kM"), "क्ं");
        assert_eq!(dev("duHkha"), "दुःख");
        assert_eq!(dev("2024"), "२०२४");
    }

    #[test]
    fn nukta_forms_are_decomposed() {
        assert_eq!(dev("za"), "ज\u{093C}");
        assert_eq!(dev("fakiir"), "फ\u{093C}कीर्");
    }

    #[test]
    fn passthrough() {
        assert_eq!(dev(""), "");
        assert_eq!(dev("ram kumar"), "रम् कुमर्");
        assert_eq!(dev("raam-lal"), "राम्-लल्");
        assert_eq!(dev("रमेश"), "रमेश");
    }

    #[test]
    fn scheme_pairs() {
        let itrans = Itrans::new();
        assert_eq!(
            itrans
                .transliterate("raama", Scheme::Itrans, Scheme::Devanagari)
                .unwrap(),
            "राम"
        );
        assert_eq!(
            itrans
                .transliterate("raama", Scheme::Itrans, Scheme::Itrans)
                .unwrap(),
            "raama"
        );
        assert!(matches!(
            itrans.transliterate("राम", Scheme::Devanagari, Scheme::Itrans),
            Err(TransliterationError::Unsupported { .. })
        ));
    }
}

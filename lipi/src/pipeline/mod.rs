//! Batch processing of a table of names.
//!
//! Each name is classified by its first character, Latin names are
//! transliterated from ITRANS into Devanagari, and every classified name gets
//! a soundex code. Rows are streamed: the input table is never held in
//! memory as a whole.
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use unic_ucd_category::GeneralCategory;

use crate::case_handling::{first_char_lower, has_upper, lower_case};
use crate::charmap::{self, Language};
use crate::soundex::{soundex_with_config, SoundexConfig};
use crate::transliterate::{Itrans, Scheme, Transliterator};

pub mod error;

pub use self::error::PipelineError;

const PROGRESS_INTERVAL: usize = 100_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub name_column: String,
    /// Column for the detected language tag; `None` leaves it out of the
    /// output.
    pub language_column: Option<String>,
    pub transliterated_column: String,
    pub code_column: String,
    /// Lower-case Latin names before transliterating. ITRANS is case
    /// sensitive, so `Ramesh` would otherwise start with an unknown `R`.
    pub fold_case: bool,
    pub delimiter: u8,
    pub soundex: SoundexConfig,
}

impl Default for PipelineConfig {
    fn default() -> PipelineConfig {
        PipelineConfig {
            name_column: "name_".into(),
            language_column: Some("name_lang".into()),
            transliterated_column: "name_hin".into(),
            code_column: "name_hin_sndx".into(),
            fold_case: true,
            delimiter: b',',
            soundex: SoundexConfig {
                length: 12,
                ..SoundexConfig::default()
            },
        }
    }
}

impl PipelineConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<PipelineConfig, PipelineError> {
        serde_json::from_reader(reader).map_err(PipelineError::Config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, PipelineError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| PipelineError::Io(path.to_string_lossy().to_string(), e))?;
        PipelineConfig::from_reader(file)
    }
}

/// A name and everything derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub language: Option<Language>,
    /// The name in Devanagari, or in its own script when that is Indic.
    pub transliterated: Option<String>,
    pub code: Option<SmolStr>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub unclassified: usize,
    pub by_language: BTreeMap<Language, usize>,
    /// Rows that had to be repaired: invalid UTF-8 in the name cell, or more
    /// fields than the header.
    pub repaired: usize,
}

impl Summary {
    fn add(&mut self, record: &NameRecord) {
        self.rows += 1;
        match record.language {
            Some(language) => *self.by_language.entry(language).or_insert(0) += 1,
            None => self.unclassified += 1,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} rows", self.rows)?;
        for (language, count) in self.by_language.iter() {
            write!(f, " [{}] {}", language, count)?;
        }
        write!(f, " [unclassified] {}", self.unclassified)?;
        if self.repaired > 0 {
            write!(f, " [repaired] {}", self.repaired)?;
        }
        Ok(())
    }
}

/// Language of a name, judged by its first character. Names without a
/// single letter are left unclassified.
pub fn detect_language(name: &str) -> Option<Language> {
    if !name.chars().any(|c| GeneralCategory::of(c).is_letter()) {
        return None;
    }

    first_char_lower(name).and_then(charmap::language)
}

pub struct Pipeline<T: Transliterator = Itrans> {
    config: PipelineConfig,
    transliterator: T,
}

impl Pipeline<Itrans> {
    pub fn new(config: PipelineConfig) -> Pipeline<Itrans> {
        Pipeline::with_transliterator(config, Itrans::new())
    }
}

impl<T: Transliterator> Pipeline<T> {
    pub fn with_transliterator(config: PipelineConfig, transliterator: T) -> Pipeline<T> {
        Pipeline {
            config,
            transliterator,
        }
    }

    #[inline(always)]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn process_name(&self, name: &str) -> Result<NameRecord, PipelineError> {
        let trimmed = name.trim();
        let language = detect_language(trimmed);

        let transliterated = match language {
            Some(Language::English) => {
                let source = if self.config.fold_case && has_upper(trimmed) {
                    lower_case(trimmed).to_string()
                } else {
                    trimmed.to_string()
                };
                Some(self.transliterator.transliterate(
                    &source,
                    Scheme::Itrans,
                    Scheme::Devanagari,
                )?)
            }
            Some(_) => Some(trimmed.to_string()),
            None => {
                log::debug!("Unclassified name: {:?}", name);
                None
            }
        };

        let code = transliterated
            .as_deref()
            .map(|t| soundex_with_config(t, &self.config.soundex));

        Ok(NameRecord {
            name: name.to_string(),
            language,
            transliterated,
            code,
        })
    }

    /// Reads a table with a header row from `reader` and writes it to
    /// `writer` with the derived columns appended.
    pub fn run<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<Summary, PipelineError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .flexible(true)
            .from_reader(reader);
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter)
            .flexible(true)
            .from_writer(writer);

        let headers = rdr.byte_headers()?.clone();
        let name_index = headers
            .iter()
            .position(|h| h == self.config.name_column.as_bytes())
            .ok_or_else(|| PipelineError::MissingColumn(self.config.name_column.clone()))?;

        let mut out_headers = headers.clone();
        if let Some(column) = self.config.language_column.as_ref() {
            out_headers.push_field(column.as_bytes());
        }
        out_headers.push_field(self.config.transliterated_column.as_bytes());
        out_headers.push_field(self.config.code_column.as_bytes());
        wtr.write_byte_record(&out_headers)?;

        log::info!("Reading names from column '{}'", self.config.name_column);

        let mut summary = Summary::default();
        for result in rdr.byte_records() {
            let mut record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let mut repaired = false;

            if record.len() > headers.len() {
                log::warn!(
                    "Line {}: {} fields for {} columns, dropping the extra fields",
                    line,
                    record.len(),
                    headers.len()
                );
                record.truncate(headers.len());
                repaired = true;
            }
            while record.len() < headers.len() {
                record.push_field(b"");
            }

            let raw = record.get(name_index).unwrap_or(b"");
            let name = match std::str::from_utf8(raw) {
                Ok(name) => name.to_string(),
                Err(_) => {
                    log::warn!("Line {}: name is not valid UTF-8", line);
                    repaired = true;
                    String::from_utf8_lossy(raw).into_owned()
                }
            };
            let processed = self.process_name(&name)?;
            summary.add(&processed);
            if repaired {
                summary.repaired += 1;
            }

            if self.config.language_column.is_some() {
                let tag = processed.language.map(Language::tag).unwrap_or("");
                record.push_field(tag.as_bytes());
            }
            record.push_field(processed.transliterated.as_deref().unwrap_or("").as_bytes());
            record.push_field(processed.code.as_deref().unwrap_or("").as_bytes());
            wtr.write_byte_record(&record)?;

            if summary.rows % PROGRESS_INTERVAL == 0 {
                log::info!("{} names processed", summary.rows);
            }
        }

        wtr.flush().map_err(csv::Error::from)?;
        log::info!("Done: {}", summary);

        Ok(summary)
    }

    pub fn run_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<Summary, PipelineError> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let reader = File::open(input)
            .map_err(|e| PipelineError::Io(input.to_string_lossy().to_string(), e))?;
        let writer = File::create(output)
            .map_err(|e| PipelineError::Io(output.to_string_lossy().to_string(), e))?;

        self.run(reader, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transliterate::TransliterationError;

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineConfig::default())
    }

    #[test]
    fn latin_names_are_transliterated() {
        let record = pipeline().process_name("ramesh").unwrap();
        assert_eq!(record.language, Some(Language::English));
        assert_eq!(record.transliterated.as_deref(), Some("रमेश्"));
        assert_eq!(record.code.as_deref(), Some("रNDS00000000"));
    }

    #[test]
    fn spelling_variants_share_a_code() {
        let p = pipeline();
        let latin = p.process_name("Ramesh").unwrap();
        let hindi = p.process_name("रमेश").unwrap();
        assert_eq!(hindi.language, Some(Language::Hindi));
        assert_eq!(hindi.transliterated.as_deref(), Some("रमेश"));
        assert_eq!(latin.code, hindi.code);
    }

    #[test]
    fn case_folding_can_be_disabled() {
        let p = Pipeline::new(PipelineConfig {
            fold_case: false,
            ..PipelineConfig::default()
        });
        let record = p.process_name("Raama").unwrap();
        assert_eq!(record.language, Some(Language::English));
        assert_eq!(record.transliterated.as_deref(), Some("Rआम"));
    }

    #[test]
    fn other_indic_scripts_are_kept() {
        let record = pipeline().process_name("ரமேஷ்").unwrap();
        assert_eq!(record.language, Some(Language::Tamil));
        assert_eq!(record.transliterated.as_deref(), Some("ரமேஷ்"));
        assert_eq!(record.code.as_deref(), Some("ரNDS00000000"));
    }

    #[test]
    fn unclassified_names() {
        let p = pipeline();
        for name in &["", "   ", "42", "Ωmega", "-"] {
            let record = p.process_name(name).unwrap();
            assert_eq!(record.language, None, "{:?}", name);
            assert_eq!(record.transliterated, None);
            assert_eq!(record.code, None);
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let record = pipeline().process_name("  seetaa ").unwrap();
        assert_eq!(record.name, "  seetaa ");
        assert_eq!(record.transliterated.as_deref(), Some("सीता"));
    }

    #[test]
    fn run_appends_columns() {
        let input = "id,name_\n1,ramesh\n2,रमेश\n3,42\n";
        let mut output = Vec::new();
        let summary = pipeline().run(input.as_bytes(), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,name_,name_lang,name_hin,name_hin_sndx\n\
             1,ramesh,en_US,रमेश्,रNDS00000000\n\
             2,रमेश,hi_IN,रमेश,रNDS00000000\n\
             3,42,,,\n"
        );
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.unclassified, 1);
        assert_eq!(summary.by_language.get(&Language::English), Some(&1));
        assert_eq!(summary.by_language.get(&Language::Hindi), Some(&1));
        assert_eq!(
            summary.to_string(),
            "3 rows [hi_IN] 1 [en_US] 1 [unclassified] 1"
        );
    }

    #[test]
    fn run_without_language_column() {
        let config = PipelineConfig {
            language_column: None,
            delimiter: b'\t',
            ..PipelineConfig::default()
        };
        let input = "name_\tvillage\nsunitaa\tx\nशिव\n";
        let mut output = Vec::new();
        Pipeline::new(config)
            .run(input.as_bytes(), &mut output)
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "name_\tvillage\tname_hin\tname_hin_sndx");
        assert_eq!(lines[1], "sunitaa\tx\tसुनिता\tसCLBKA000000");
        // Short rows are padded before the derived columns.
        assert_eq!(lines[2], "शिव\t\tशिव\tशBR000000000");
    }

    #[test]
    fn missing_name_column() {
        let input = "id,name\n1,ramesh\n";
        match pipeline().run(input.as_bytes(), Vec::new()) {
            Err(PipelineError::MissingColumn(column)) => assert_eq!(column, "name_"),
            other => panic!("unexpected result: {:?}", other.map(|s| s.rows)),
        }
    }

    #[test]
    fn extra_fields_are_dropped() {
        let input = "name_,id\nramesh,1,extra\nशिव,2\n";
        let mut output = Vec::new();
        let summary = pipeline().run(input.as_bytes(), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "name_,id,name_lang,name_hin,name_hin_sndx\n\
             ramesh,1,en_US,रमेश्,रNDS00000000\n\
             शिव,2,hi_IN,शिव,शBR000000000\n"
        );
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.repaired, 1);
        assert_eq!(
            summary.to_string(),
            "2 rows [hi_IN] 1 [en_US] 1 [unclassified] 0 [repaired] 1"
        );
    }

    #[test]
    fn invalid_utf8_does_not_stop_the_run() {
        let input: &[u8] = b"name_\nramesh\nra\xffm\nsuresh\n";
        let mut output = Vec::new();
        let summary = pipeline().run(input, &mut output).unwrap();

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.repaired, 1);
        assert_eq!(summary.by_language.get(&Language::English), Some(&3));

        // The broken cell is copied through as it was read.
        let lines = output.split(|b| *b == b'\n').collect::<Vec<_>>();
        assert!(lines[2].starts_with(b"ra\xffm,en_US,"));
        assert_eq!(
            std::str::from_utf8(lines[3]).unwrap(),
            "suresh,en_US,सुरेश्,सCPDS0000000"
        );
    }

    #[test]
    fn run_paths() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("names.csv");
        let output = dir.path().join("names_sndx.csv");
        std::fs::write(&input, "name_\ndeepak\n").unwrap();

        let summary = pipeline().run_paths(&input, &output).unwrap();
        assert_eq!(summary.rows, 1);

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("name_,name_lang,name_hin,name_hin_sndx\n"));
        assert!(written.ends_with("deepak,en_US,दीपक्,दBMF00000000\n"));

        assert!(matches!(
            pipeline().run_paths(dir.path().join("missing.csv"), &output),
            Err(PipelineError::Io(..))
        ));
    }

    #[test]
    fn config_from_json() {
        let json = r#"{ "name_column": "name", "language_column": null, "soundex": { "length": 6 } }"#;
        let config = PipelineConfig::from_reader(json.as_bytes()).unwrap();
        assert_eq!(config.name_column, "name");
        assert_eq!(config.language_column, None);
        assert_eq!(config.transliterated_column, "name_hin");
        assert_eq!(config.soundex.length, 6);
        assert!(!config.soundex.fixed_length_latin);
        assert!(config.fold_case);

        assert!(matches!(
            PipelineConfig::from_reader("{ nope".as_bytes()),
            Err(PipelineError::Config(_))
        ));
    }

    struct Refusing;

    impl Transliterator for Refusing {
        fn transliterate(
            &self,
            _text: &str,
            from: Scheme,
            to: Scheme,
        ) -> Result<String, TransliterationError> {
            Err(TransliterationError::Unsupported { from, to })
        }
    }

    #[test]
    fn transliteration_errors_stop_the_run() {
        let p = Pipeline::with_transliterator(PipelineConfig::default(), Refusing);
        assert!(matches!(
            p.process_name("ramesh"),
            Err(PipelineError::Transliteration(_))
        ));
        // Indic names never reach the transliterator.
        assert!(p.process_name("रमेश").is_ok());
    }
}

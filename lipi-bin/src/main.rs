use std::io::{self, Read};
use std::path::PathBuf;

use serde::Serialize;
use structopt::StructOpt;

use lipi::charmap::{self, CharComparison, Language};
use lipi::pipeline::{detect_language, NameRecord, Pipeline, PipelineConfig, Summary};
use lipi::soundex::{self, NameComparison, SoundexConfig};
use lipi::transliterate::{Itrans, Scheme, Transliterator};

trait OutputWriter {
    fn write_language(&mut self, c: char, language: Option<Language>);
    fn write_comparison(&mut self, a: &str, b: &str, result: &str);
    fn write_record(&mut self, record: &NameRecord);
    fn write_summary(&mut self, summary: &Summary);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_language(&mut self, c: char, language: Option<Language>) {
        match language {
            Some(language) => println!("{}\t{}", c, language),
            None => println!("{}\tnot found", c),
        }
    }

    fn write_comparison(&mut self, a: &str, b: &str, result: &str) {
        println!("{}\t{}\t{}", a, b, result);
    }

    fn write_record(&mut self, record: &NameRecord) {
        println!(
            "{}\t{}\t{}\t{}",
            record.name,
            record.language.map(Language::tag).unwrap_or("-"),
            record.transliterated.as_deref().unwrap_or("-"),
            record.code.as_deref().unwrap_or("-"),
        );
    }

    fn write_summary(&mut self, summary: &Summary) {
        println!("{}", summary);
    }

    fn finish(&mut self) {}
}

#[derive(Serialize)]
struct LanguageResult {
    character: char,
    language: Option<Language>,
}

#[derive(Serialize)]
struct ComparisonResult {
    a: String,
    b: String,
    result: String,
}

#[derive(Serialize, Default)]
struct JsonWriter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    languages: Vec<LanguageResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    comparisons: Vec<ComparisonResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    names: Vec<NameRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

impl OutputWriter for JsonWriter {
    fn write_language(&mut self, c: char, language: Option<Language>) {
        self.languages.push(LanguageResult {
            character: c,
            language,
        });
    }

    fn write_comparison(&mut self, a: &str, b: &str, result: &str) {
        self.comparisons.push(ComparisonResult {
            a: a.to_owned(),
            b: b.to_owned(),
            result: result.to_owned(),
        });
    }

    fn write_record(&mut self, record: &NameRecord) {
        self.names.push(record.clone());
    }

    fn write_summary(&mut self, summary: &Summary) {
        self.summary = Some(summary.clone());
    }

    fn finish(&mut self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialise output: {}", e),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lipi",
    about = "Script detection, soundex codes and ITRANS transliteration for names."
)]
struct Args {
    #[structopt(long = "json", global = true, help = "output in JSON format")]
    use_json: bool,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    #[structopt(about = "Print the language of each character")]
    Language {
        #[structopt(help = "characters or words; every character is classified")]
        inputs: Vec<String>,
    },

    #[structopt(about = "Compare two characters by their alphabet positions")]
    Compare { a: char, b: char },

    #[structopt(about = "Print soundex codes for names")]
    Soundex(SoundexArgs),

    #[structopt(about = "Compare two names by their soundex codes")]
    Match { a: String, b: String },

    #[structopt(about = "Transliterate ITRANS text into Devanagari")]
    Transliterate {
        #[structopt(help = "text to be transliterated; read from stdin when empty")]
        inputs: Vec<String>,
    },

    #[structopt(about = "Classify, transliterate and encode a table of names")]
    Process(ProcessArgs),
}

#[derive(Debug, StructOpt)]
struct SoundexArgs {
    #[structopt(short, long, default_value = "8", help = "length of Indic codes")]
    length: usize,

    #[structopt(long = "fixed-latin", help = "pad and truncate Latin codes too")]
    fixed_length_latin: bool,

    #[structopt(help = "names to be encoded; read from stdin when empty")]
    inputs: Vec<String>,
}

#[derive(Debug, StructOpt)]
struct ProcessArgs {
    #[structopt(short, long, parse(from_os_str), help = "input CSV with a header row")]
    input: PathBuf,

    #[structopt(short, long, parse(from_os_str), help = "output CSV")]
    output: PathBuf,

    #[structopt(short, long, parse(from_os_str), help = "JSON file overriding the defaults")]
    config: Option<PathBuf>,

    #[structopt(short, long, help = "soundex code length")]
    length: Option<usize>,
}

fn read_lines(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !inputs.is_empty() {
        return Ok(inputs);
    }

    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer
        .lines()
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(str::to_string)
        .collect())
}

fn language(inputs: Vec<String>, writer: &mut dyn OutputWriter) -> anyhow::Result<()> {
    for c in inputs.iter().flat_map(|s| s.chars()) {
        writer.write_language(c, charmap::language(c));
    }
    Ok(())
}

fn compare(a: char, b: char, writer: &mut dyn OutputWriter) -> anyhow::Result<()> {
    let result = match charmap::compare(a, b) {
        CharComparison::Identical => "identical",
        CharComparison::Equivalent => "equivalent",
        CharComparison::Different => "different",
        CharComparison::NotFound => "not found",
    };
    writer.write_comparison(&a.to_string(), &b.to_string(), result);
    Ok(())
}

fn name_match(a: &str, b: &str, writer: &mut dyn OutputWriter) -> anyhow::Result<()> {
    let result = match soundex::compare(a, b) {
        NameComparison::Identical => "identical",
        NameComparison::SameLanguage => "same language",
        NameComparison::CrossLanguage => "cross language",
        NameComparison::Different => "different",
        NameComparison::Incomparable => "incomparable",
    };
    writer.write_comparison(a, b, result);
    Ok(())
}

fn encode(args: SoundexArgs, writer: &mut dyn OutputWriter) -> anyhow::Result<()> {
    let cfg = SoundexConfig {
        length: args.length,
        fixed_length_latin: args.fixed_length_latin,
    };

    for name in read_lines(args.inputs)? {
        let code = soundex::soundex_with_config(&name, &cfg);
        writer.write_record(&NameRecord {
            language: detect_language(&name),
            transliterated: None,
            code: Some(code),
            name,
        });
    }
    Ok(())
}

fn transliterate(inputs: Vec<String>, writer: &mut dyn OutputWriter) -> anyhow::Result<()> {
    let itrans = Itrans::new();
    for text in read_lines(inputs)? {
        let transliterated = itrans.transliterate(&text, Scheme::Itrans, Scheme::Devanagari)?;
        writer.write_record(&NameRecord {
            name: text,
            language: None,
            transliterated: Some(transliterated),
            code: None,
        });
    }
    Ok(())
}

fn process(args: ProcessArgs, writer: &mut dyn OutputWriter) -> anyhow::Result<()> {
    let mut config = match args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(length) = args.length {
        config.soundex.length = length;
    }

    let summary = Pipeline::new(config).run_paths(&args.input, &args.output)?;
    log::info!("Written to {}", args.output.display());
    writer.write_summary(&summary);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::from_args();

    let mut writer: Box<dyn OutputWriter> = if args.use_json {
        Box::new(JsonWriter::default())
    } else {
        Box::new(StdoutWriter)
    };

    match args.command {
        Command::Language { inputs } => language(inputs, &mut *writer)?,
        Command::Compare { a, b } => compare(a, b, &mut *writer)?,
        Command::Soundex(args) => encode(args, &mut *writer)?,
        Command::Match { a, b } => name_match(&a, &b, &mut *writer)?,
        Command::Transliterate { inputs } => transliterate(inputs, &mut *writer)?,
        Command::Process(args) => process(args, &mut *writer)?,
    }

    writer.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_output_carries_the_summary() {
        let summary = Summary {
            rows: 2,
            unclassified: 1,
            by_language: vec![(Language::English, 1)].into_iter().collect(),
            repaired: 0,
        };

        let mut writer = JsonWriter::default();
        writer.write_summary(&summary);
        let json = serde_json::to_value(&writer).unwrap();

        assert_eq!(json["summary"]["rows"], 2);
        assert_eq!(json["summary"]["unclassified"], 1);
        assert_eq!(json["summary"]["by_language"]["en_US"], 1);
        assert!(json.get("names").is_none());
    }

    #[test]
    fn json_output_without_summary() {
        let json = serde_json::to_value(&JsonWriter::default()).unwrap();
        assert!(json.get("summary").is_none());
    }
}

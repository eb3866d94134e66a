use chrono::prelude::*;
use std::error::Error;
use std::{
    io::Write,
    time::{Instant, SystemTime},
};

use distance::damerau_levenshtein;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use lipi::pipeline::{NameRecord, Pipeline, PipelineConfig, PipelineError};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use structopt::clap::{App, AppSettings, Arg};

fn load_words(
    path: &str,
    max_words: Option<usize>,
) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    Ok(rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|r| {
            r.get(0)
                .and_then(|x| r.get(1).map(|y| (x.to_string(), y.to_string())))
        })
        .take(max_words.unwrap_or(std::usize::MAX))
        .collect())
}

#[derive(Debug, Default, Serialize, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
struct Time {
    secs: u64,
    subsec_nanos: u32,
}

impl Time {
    fn from_duration(d: std::time::Duration) -> Time {
        Time {
            secs: d.as_secs(),
            subsec_nanos: d.subsec_nanos(),
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let us = self.secs * 1_000_000 + (self.subsec_nanos as u64 / 1_000);
        write!(f, "{}µs", us)
    }
}

#[derive(Debug, Serialize)]
struct AccuracyResult {
    input: NameRecord,
    expected: NameRecord,
    distance: usize,
    is_match: bool,
    time: Time,
}

impl AccuracyResult {
    fn is_classified(&self) -> bool {
        self.input.code.is_some() && self.expected.code.is_some()
    }

    fn is_cross_script(&self) -> bool {
        self.input.language != self.expected.language
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    config: &'a PipelineConfig,
    summary: Summary,
    results: Vec<AccuracyResult>,
    start_timestamp: Time,
    total_time: Time,
}

#[derive(Serialize, Default, Debug, Clone)]
struct Summary {
    total_pairs: u32,
    matched: u32,
    mismatched: u32,
    unclassified: u32,
    cross_script: u32,
    cross_script_matched: u32,
    mean_distance_matched: f32,
    mean_distance_mismatched: f32,
    slowest_lookup: Time,
    fastest_lookup: Time,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let percent = |v: u32, total: u32| -> String {
            if total == 0 {
                "-".to_string()
            } else {
                format!("{:.2}%", v as f32 / total as f32 * 100f32)
            }
        };

        write!(
            f,
            "[match] {} [mismatch] {} [unclassified] {} [cross-script match] {} [dist] {:.2}/{:.2} [fast] {} [slow] {}",
            percent(self.matched, self.total_pairs),
            percent(self.mismatched, self.total_pairs),
            percent(self.unclassified, self.total_pairs),
            percent(self.cross_script_matched, self.cross_script),
            self.mean_distance_matched,
            self.mean_distance_mismatched,
            self.fastest_lookup,
            self.slowest_lookup
        )
    }
}

impl Summary {
    fn new(results: &[AccuracyResult]) -> Summary {
        let mut summary = Summary::default();
        let mut distance_matched = 0usize;
        let mut distance_mismatched = 0usize;

        results.iter().for_each(|result| {
            summary.total_pairs += 1;

            if !result.is_classified() {
                summary.unclassified += 1;
                return;
            }

            if result.is_cross_script() {
                summary.cross_script += 1;
            }

            if result.is_match {
                summary.matched += 1;
                distance_matched += result.distance;
                if result.is_cross_script() {
                    summary.cross_script_matched += 1;
                }
            } else {
                summary.mismatched += 1;
                distance_mismatched += result.distance;
            }
        });

        let mean = |total: usize, n: u32| -> f32 {
            if n == 0 {
                0.0
            } else {
                total as f32 / n as f32
            }
        };
        summary.mean_distance_matched = mean(distance_matched, summary.matched);
        summary.mean_distance_mismatched = mean(distance_mismatched, summary.mismatched);

        summary.slowest_lookup = results.iter().map(|x| x.time).max().unwrap_or_default();
        summary.fastest_lookup = results.iter().map(|x| x.time).min().unwrap_or_default();

        summary
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let matches = App::new("lipi-accuracy")
        .setting(AppSettings::ArgRequiredElseHelp)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Measures how often spelling variants of a name share a soundex code.")
        .arg(
            Arg::with_name("config")
                .short("c")
                .takes_value(true)
                .help("Provide JSON config file to override pipeline defaults"),
        )
        .arg(
            Arg::with_name("words")
                .value_name("WORDS")
                .help("The 'variant -> expected' name list in tab-delimited value file (TSV)"),
        )
        .arg(
            Arg::with_name("json-output")
                .short("o")
                .value_name("JSON-OUTPUT")
                .help("The file path for the JSON report output"),
        )
        .arg(
            Arg::with_name("tsv-output")
                .short("t")
                .value_name("TSV-OUTPUT")
                .help("The file path for the TSV line append"),
        )
        .arg(
            Arg::with_name("max-words")
                .short("w")
                .takes_value(true)
                .help("Truncate name list to max number of pairs specified"),
        )
        .get_matches();

    let cfg: PipelineConfig = match matches.value_of("config") {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    let words_path = match matches.value_of("words") {
        Some(path) => path,
        None => {
            eprintln!("No name list for given path; aborting.");
            std::process::exit(1);
        }
    };
    let words = load_words(
        words_path,
        matches
            .value_of("max-words")
            .and_then(|x| x.parse::<usize>().ok()),
    )?;

    let pipeline = Pipeline::new(cfg);

    let pb = ProgressBar::new(words.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} [{percent}%] {wide_bar} {elapsed_precise}"),
    );

    let start_time = Instant::now();
    let results = words
        .par_iter()
        .progress_with(pb)
        .map(|(input, expected)| -> Result<AccuracyResult, PipelineError> {
            let now = Instant::now();
            let input_record = pipeline.process_name(input)?;
            let expected_record = pipeline.process_name(expected)?;
            let time = Time::from_duration(now.elapsed());

            let is_match = input_record.code.is_some() && input_record.code == expected_record.code;
            let distance = damerau_levenshtein(input, expected);

            Ok(AccuracyResult {
                input: input_record,
                expected: expected_record,
                distance,
                is_match,
                time,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total_time = Time::from_duration(start_time.elapsed());
    let start_timestamp = Time::from_duration(
        SystemTime::now().duration_since(SystemTime::UNIX_EPOCH)?,
    );

    let summary = Summary::new(&results);
    println!("{}", summary);

    if let Some(path) = matches.value_of("json-output") {
        let output = std::fs::File::create(path)?;
        let report = Report {
            config: pipeline.config(),
            summary,
            results,
            start_timestamp,
            total_time,
        };
        println!("Writing JSON report…");
        serde_json::to_writer_pretty(output, &report)?;
    } else if let Some(path) = matches.value_of("tsv-output") {
        let mut output = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let md = output.metadata()?;
        if md.len() == 0 {
            // new file, write headers:
            output.write_all(
                b"date\twords\tpairs\tmatched\tmismatched\tunclassified\tcross script\tcross script matched\n",
            )?;
        }
        writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            Local::now().to_rfc3339(),
            words_path,
            summary.total_pairs,
            summary.matched,
            summary.mismatched,
            summary.unclassified,
            summary.cross_script,
            summary.cross_script_matched,
        )?;
    };

    println!("Done!");
    Ok(())
}

//! Thin binary wrapper around [`jpnt::Builder`], grounded in
//! `legacy::dart::builder::IndexBuilder` wrapping the core trie builder:
//! reads dictionary JSON and a word-list text file, runs the pipeline, and
//! writes the serialized artifact. No algorithmic logic of its own.

mod config;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;
use serde::Deserialize;
use snafu::{ResultExt, Snafu};
use tracing::{info, warn};

use config::BuilderConfig;

#[derive(Debug, Parser)]
#[command(about = "Builds a jpnt binary dictionary artifact")]
struct Args {
    /// Optional config.toml providing defaults for any flag left unset here.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// One or more JSON dictionary files, each an array of `{text, phoneme}`
    /// objects. Read in parallel when more than one is given.
    #[arg(long = "dictionary")]
    dictionaries: Vec<PathBuf>,

    /// Plain-text word list, one surface form per line. Blank lines ignored.
    #[arg(long)]
    words: Option<PathBuf>,

    /// Where to write the binary artifact.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct JsonDictEntry {
    text: String,
    phoneme: String,
}

#[derive(Debug, Snafu)]
enum CliError {
    #[snafu(display("reading dictionary file {path:?}"))]
    ReadDictionary {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("parsing dictionary file {path:?} as JSON"))]
    ParseDictionary {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[snafu(display("reading word list {path:?}"))]
    ReadWords {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("building dictionary artifact"))]
    Build { source: jpnt::Error },
    #[snafu(display("creating output file {path:?}"))]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("writing artifact to {path:?}"))]
    WriteArtifact {
        path: PathBuf,
        source: jpnt::Error,
    },
    #[snafu(display("no output path given (pass --output or set it in config.toml)"))]
    NoOutput,
    #[snafu(display("no dictionary given (pass --dictionary or set it in config.toml)"))]
    NoDictionary,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    tracing_subscriber::fmt()
        .event_format(fmt::format())
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn read_dictionary_file(path: &PathBuf) -> Result<Vec<JsonDictEntry>, CliError> {
    let text = fs::read_to_string(path).context(ReadDictionarySnafu { path: path.clone() })?;
    serde_json::from_str(&text).context(ParseDictionarySnafu { path: path.clone() })
}

fn read_word_list(path: &PathBuf) -> Result<Vec<String>, CliError> {
    let text = fs::read_to_string(path).context(ReadWordsSnafu { path: path.clone() })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect())
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    let file_config = BuilderConfig::load(&args.config);

    let dictionaries = if args.dictionaries.is_empty() {
        file_config.dictionary.into_iter().collect::<Vec<_>>()
    } else {
        args.dictionaries
    };
    if dictionaries.is_empty() {
        return Err(CliError::NoDictionary);
    }

    let words_path = args.words.or(file_config.words);
    let output_path = args.output.or(file_config.output).ok_or(CliError::NoOutput)?;

    info!(n_files = dictionaries.len(), "reading dictionary files");
    let parsed: Vec<Vec<JsonDictEntry>> = dictionaries
        .par_iter()
        .map(read_dictionary_file)
        .collect::<Result<_, _>>()?;

    let mut builder = jpnt::Builder::new();
    for entries in parsed {
        builder.add_entries(
            entries
                .into_iter()
                .map(|e| jpnt::DictEntry::new(e.text, e.phoneme)),
        );
    }

    if let Some(words_path) = &words_path {
        info!(?words_path, "reading word list");
        builder.add_words(read_word_list(words_path)?);
    }

    let (trie, report, counts) = builder.build().context(BuildSnafu)?;

    for (text, bad_char) in &report.vocab_warnings {
        warn!(%text, %bad_char, "non-vocabulary phoneme character");
    }
    for text in &report.generator_collisions {
        warn!(%text, "generated conjugation collided with a dictionary entry");
    }

    let mut out = fs::File::create(&output_path).context(CreateOutputSnafu {
        path: output_path.clone(),
    })?;
    jpnt::write_trie(&trie, counts.n_phoneme_entries, counts.n_word_entries, &mut out)
        .context(WriteArtifactSnafu {
            path: output_path.clone(),
        })?;

    info!(
        n_phoneme_entries = counts.n_phoneme_entries,
        n_word_entries = counts.n_word_entries,
        output = ?output_path,
        "wrote dictionary artifact"
    );
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        tracing::error!(%err, "build failed");
        std::process::exit(1);
    }
}

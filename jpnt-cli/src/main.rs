//! Thin binary wrapper around [`jpnt::convert`], grounded in
//! `legacy::main`'s style of a small binary wrapping the morph/furigana
//! libraries: load an artifact, convert text, print phonemes. No
//! algorithmic logic of its own.

mod config;

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use snafu::{ResultExt, Snafu};
use tracing::info;

use config::CliConfig;

#[derive(Debug, Parser)]
#[command(about = "Converts Japanese text to IPA phonemes")]
struct Args {
    /// Optional config.toml providing defaults for any flag left unset here.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Built binary dictionary artifact (see jpnt-builder).
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Text to convert. Reads stdin to EOF if omitted.
    text: Option<String>,

    /// Disables word segmentation (spaces between converted words).
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_segment: bool,
}

#[derive(Debug, Snafu)]
enum CliError {
    #[snafu(display("no dictionary given (pass --dictionary or set it in config.toml)"))]
    NoDictionary,
    #[snafu(display("reading dictionary artifact {path:?}"))]
    ReadArtifact {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("loading dictionary artifact {path:?}"))]
    LoadArtifact { path: PathBuf, source: jpnt::Error },
    #[snafu(display("reading input text from stdin"))]
    ReadStdin { source: std::io::Error },
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    tracing_subscriber::fmt()
        .event_format(fmt::format())
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    let file_config = CliConfig::load(&args.config);

    let dictionary_path = args
        .dictionary
        .or(file_config.dictionary)
        .ok_or(CliError::NoDictionary)?;

    let bytes = std::fs::read(&dictionary_path).context(ReadArtifactSnafu {
        path: dictionary_path.clone(),
    })?;
    let artifact = jpnt::load(&bytes[..]).context(LoadArtifactSnafu {
        path: dictionary_path.clone(),
    })?;
    info!(
        ?dictionary_path,
        n_phoneme_entries = artifact.n_phoneme_entries(),
        n_word_entries = artifact.n_word_entries(),
        "loaded dictionary artifact"
    );

    let segment_words = if args.no_segment {
        false
    } else {
        file_config.segment.unwrap_or(true)
    };
    let cfg = jpnt::Config { segment_words };

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context(ReadStdinSnafu)?;
            buf
        }
    };

    println!("{}", jpnt::convert(artifact.trie(), &text, cfg));
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        tracing::error!(%err, "conversion failed");
        std::process::exit(1);
    }
}

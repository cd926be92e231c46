use snafu::Snafu;

/// What went wrong while parsing a serialized trie.
///
/// Kept separate from [`Error`] so that a `Format` error can carry a cheap,
/// matchable reason without inflating the top-level enum with one variant
/// per byte-layout mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatIssue {
    BadMagic,
    UnsupportedMajorVersion { found: u16 },
    TruncatedNode,
    OffsetOutOfRange { offset: i64 },
    VarintOverflow,
    InvalidUtf8Value,
}

impl std::fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FormatIssue::BadMagic => write!(f, "bad magic bytes"),
            FormatIssue::UnsupportedMajorVersion { found } => {
                write!(f, "unsupported major version {found}")
            }
            FormatIssue::TruncatedNode => write!(f, "truncated node record"),
            FormatIssue::OffsetOutOfRange { offset } => {
                write!(f, "child offset {offset} points outside the artifact")
            }
            FormatIssue::VarintOverflow => write!(f, "varint continuation chain too long"),
            FormatIssue::InvalidUtf8Value => write!(f, "node value is not valid UTF-8"),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    #[snafu(display("I/O error"))]
    Io { source: std::io::Error },

    #[snafu(display("malformed dictionary artifact: {issue}"))]
    Format { issue: FormatIssue },

    #[snafu(display("caller-supplied buffer too small: need at least {required} bytes"))]
    Bounds { required: usize },

    #[snafu(display("invalid dictionary entry: {reason}"))]
    Config { reason: String },

    #[snafu(whatever, display("{message}: {source:?}"))]
    Catchall {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while loading a model, decoding or evaluating.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model file does not follow the five-block layout.
    #[error("malformed model at line {line}: {reason}")]
    MalformedModel {
        /// 1-based line number in the model file.
        line: usize,
        reason: String,
    },

    /// Every tag ends the lattice with a score of negative infinity.
    #[error("no tag sequence can explain the sentence ({len} words)")]
    UnscoreableSentence { len: usize },

    #[error("cannot decode an empty sentence")]
    EmptySentence,

    /// Prediction and reference streams are not line or token aligned.
    /// `line` is 0 when the line counts themselves differ.
    #[error("alignment mismatch at line {line}: expected {expected}, found {found}")]
    AlignmentMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedModel {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

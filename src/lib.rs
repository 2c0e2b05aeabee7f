//! Part-of-speech tagging with a hidden Markov model.
//!
//! A trained model is loaded once with [`HmmModel::from_path`], bound to a
//! [`HmmTagger`] and applied to sentences either one at a time through the
//! [`Tagger`] trait or in bulk through a [`Runner`]. Tagged output can be
//! scored against a reference corpus with [`Evaluation`].

mod error;

pub mod dataset;
pub mod evaluation;
pub mod model;
pub mod quark;
pub mod runner;
pub mod tagger;
pub mod viterbi;

pub use dataset::{read_sentences, read_tagged, Sentence, TaggedSentence};
pub use error::{Error, Result};
pub use evaluation::{evaluate_files, Evaluation, Report};
pub use model::HmmModel;
pub use quark::{Quark, StringTable};
pub use runner::{Outcome, RunStats, Runner};
pub use tagger::{HmmTagger, Tagger};
pub use viterbi::{decode, Lattice, Path};

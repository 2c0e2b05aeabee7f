use crate::{
    error::Result,
    model::HmmModel,
    quark::{Quark, StringTable},
    viterbi::{self, Path},
};

pub trait Tagger {
    /// Tag labels, indexed the way [`Path::tags`] refers to them.
    fn labels(&self) -> &Quark;

    /// Finds the best tag path for `words`.
    fn viterbi<S: AsRef<str>>(&self, words: &[S]) -> Result<Path>;

    /// Labels `words`, one tag per word.
    fn tag<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<&str>> {
        let path = self.viterbi(words)?;
        let labels = self.labels();
        Ok(path
            .tags
            .iter()
            .map(|&i| labels.to_str(i).unwrap_or_default())
            .collect())
    }
}

/// Tagger backed by a loaded [`HmmModel`].
#[derive(Debug, Clone, Copy)]
pub struct HmmTagger<'a> {
    model: &'a HmmModel,
}

impl<'a> HmmTagger<'a> {
    pub fn new(model: &'a HmmModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'a HmmModel {
        self.model
    }
}

impl<'a> Tagger for HmmTagger<'a> {
    fn labels(&self) -> &Quark {
        self.model.tags()
    }

    fn viterbi<S: AsRef<str>>(&self, words: &[S]) -> Result<Path> {
        viterbi::decode(self.model, words)
    }
}

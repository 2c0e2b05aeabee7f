#![allow(non_snake_case)]

use crate::{
    error::{Error, Result},
    model::HmmModel,
    quark::StringTable,
};

/// Best tag sequence for one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Tag indices, one per word, left to right.
    pub tags: Vec<usize>,
    /// Log-probability of the path including the transition into `qN`.
    pub score: f64,
}

/// Dynamic-programming table of one Viterbi decode.
#[derive(Debug, Default)]
pub struct Lattice {
    /**
     * The total number of distinct tags (L).
     */
    num_tags: usize,

    /**
     * The number of words (T) in the sentence.
     */
    num_items: usize,

    /**
     * Path scores.
     *  This is a [T][L] matrix whose element [t][l] presents the best
     *  log-probability of the paths starting at q0 and arriving at (t, l).
     *  The row T-1 also includes the transition into qN once finalized.
     */
    score: Vec<f64>,

    /**
     * Backward edges.
     *  This is a [T][L] matrix whose element [t][j] represents the tag #i
     *  at t-1 that yields the maximum score to arrive at (t, j). None for
     *  t = 0 and for cells no path can reach.
     */
    backward_edge: Vec<Option<usize>>,
}

impl Lattice {
    pub fn new(num_tags: usize, num_items: usize) -> Self {
        Self {
            num_tags,
            num_items,
            score: vec![f64::NEG_INFINITY; num_tags * num_items],
            backward_edge: vec![None; num_tags * num_items],
        }
    }

    /// Fills a fresh lattice for `words` under `model`.
    pub fn forward<S: AsRef<str>>(model: &HmmModel, words: &[S]) -> Result<Self> {
        if words.is_empty() {
            return Err(Error::EmptySentence);
        }
        let L = model.num_tags();
        let T = words.len();
        let mut this = Self::new(L, T);
        let vocab = model.vocab();

        /* Compute the scores at (0, *). */
        let w = vocab.to_id(words[0].as_ref());
        for j in 0..L {
            let emission = emission_term(model, j, w);
            if emission == f64::NEG_INFINITY {
                continue;
            }
            this.score[j] = model.log_transition(model.start(), j) + emission;
        }

        /* Compute the scores at (t, *). */
        for t in 1..T {
            let w = vocab.to_id(words[t].as_ref());
            for j in 0..L {
                /* The emission term does not depend on the predecessor. */
                let emission = emission_term(model, j, w);
                if emission == f64::NEG_INFINITY {
                    continue;
                }
                let mut max_score = f64::NEG_INFINITY;
                let mut argmax_score = None;
                for i in 0..L {
                    let prev = this.score[L * (t - 1) + i];
                    if prev == f64::NEG_INFINITY {
                        continue;
                    }
                    /* Transit from (t-1, i) to (t, j). */
                    let score = prev + model.log_transition(i, j) + emission;
                    /* Keep the first maximum. */
                    if score > max_score {
                        max_score = score;
                        argmax_score = Some(i);
                    }
                }
                this.score[L * t + j] = max_score;
                this.backward_edge[L * t + j] = argmax_score;
            }
        }

        /* Transit from (T-1, *) to qN. */
        for i in 0..L {
            let cell = &mut this.score[L * (T - 1) + i];
            if *cell != f64::NEG_INFINITY {
                *cell += model.log_transition(i, model.end());
            }
        }
        Ok(this)
    }

    /// Traces the backward edges from the best final cell.
    pub fn backward(&self) -> Result<Path> {
        let L = self.num_tags;
        let T = self.num_items;
        if T == 0 {
            return Err(Error::EmptySentence);
        }

        /* Find the node (T-1, i) that reaches qN with the maximum score. */
        let mut max_score = f64::NEG_INFINITY;
        let mut last = None;
        for i in 0..L {
            let score = self.score[L * (T - 1) + i];
            if score > max_score {
                max_score = score;
                last = Some(i);
            }
        }
        let last = last.ok_or(Error::UnscoreableSentence { len: T })?;

        /* Tag words by tracing the backward links. */
        let mut tags = vec![0; T];
        tags[T - 1] = last;
        for t in (1..T).rev() {
            tags[t - 1] = self.backward_edge[L * t + tags[t]]
                .ok_or(Error::UnscoreableSentence { len: T })?;
        }
        Ok(Path {
            tags,
            score: max_score,
        })
    }

    pub fn len(&self) -> usize {
        self.num_items
    }

    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    pub fn num_tags(&self) -> usize {
        self.num_tags
    }

    pub fn score(&self, t: usize, tag: usize) -> f64 {
        self.score[self.num_tags * t + tag]
    }

    pub fn backpointer(&self, t: usize, tag: usize) -> Option<usize> {
        self.backward_edge[self.num_tags * t + tag]
    }
}

/// Log-probability of `tag` producing the word with vocabulary index `word`.
///
/// Unknown words (`None`) cost nothing under an open tag and are impossible
/// otherwise. Sentinel tags never label a word.
fn emission_term(model: &HmmModel, tag: usize, word: Option<usize>) -> f64 {
    if model.is_sentinel(tag) {
        return f64::NEG_INFINITY;
    }
    match word {
        Some(w) => model.log_emission(tag, w),
        None if model.is_open(tag) => 0.0,
        None => f64::NEG_INFINITY,
    }
}

/// Runs the forward and backward passes over one sentence.
pub fn decode<S: AsRef<str>>(model: &HmmModel, words: &[S]) -> Result<Path> {
    let lattice = Lattice::forward(model, words)?;
    let path = lattice.backward()?;
    log::debug!("decoded {} words, score = {}", words.len(), path.score);
    Ok(path)
}

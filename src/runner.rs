use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use serde::Serialize;

use crate::{
    dataset::{read_sentences, Sentence},
    error::Result,
    tagger::Tagger,
};

/// Result of tagging one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Tagged { words: Vec<String>, tags: Vec<String> },
    /// No tag path explains the sentence; written with empty tags.
    Unscoreable { words: Vec<String> },
    /// Blank input line; written as a blank line.
    Empty,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Tagged { words, tags } => {
                for (i, (word, tag)) in words.iter().zip(tags).enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{word}/{tag}")?;
                }
                Ok(())
            }
            Outcome::Unscoreable { words } => {
                for (i, word) in words.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{word}/")?;
                }
                Ok(())
            }
            Outcome::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub tagged: usize,
    pub unscoreable: usize,
    pub empty: usize,
}

impl RunStats {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Tagged { .. } => stats.tagged += 1,
                Outcome::Unscoreable { .. } => stats.unscoreable += 1,
                Outcome::Empty => stats.empty += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.tagged + self.unscoreable + self.empty
    }
}

/// Applies a [`Tagger`] to a batch of sentences.
///
/// A sentence that cannot be decoded never aborts the batch: it is logged
/// and kept as an [`Outcome::Unscoreable`] or [`Outcome::Empty`] so the output
/// stays line-aligned with the input.
pub struct Runner<'t, T> {
    tagger: &'t T,
    parallel: bool,
}

impl<'t, T: Tagger + Sync> Runner<'t, T> {
    pub fn new(tagger: &'t T) -> Self {
        Self {
            tagger,
            parallel: false,
        }
    }

    /// Decode sentences on the rayon thread pool. Requires the `parallel`
    /// feature; otherwise the batch runs sequentially.
    pub fn parallel(mut self, parallel: bool) -> Self {
        if parallel && !cfg!(feature = "parallel") {
            log::warn!("built without the `parallel` feature, decoding sequentially");
        }
        self.parallel = parallel;
        self
    }

    pub fn tag_sentence(&self, sentence: &Sentence) -> Outcome {
        if sentence.is_empty() {
            return Outcome::Empty;
        }
        match self.tagger.tag(&sentence.words) {
            Ok(tags) => Outcome::Tagged {
                words: sentence.words.clone(),
                tags: tags.into_iter().map(str::to_string).collect(),
            },
            Err(e) => {
                log::warn!("{e}: {}", sentence.words.join(" "));
                Outcome::Unscoreable {
                    words: sentence.words.clone(),
                }
            }
        }
    }

    pub fn run(&self, sentences: &[Sentence]) -> Vec<Outcome> {
        if self.parallel {
            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                return sentences.par_iter().map(|s| self.tag_sentence(s)).collect();
            }
        }
        sentences.iter().map(|s| self.tag_sentence(s)).collect()
    }

    /// Tags every line of `input` and writes the result to `output`.
    pub fn run_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<RunStats> {
        let begin = Instant::now();
        let sentences = read_sentences(input.as_ref())?;
        let outcomes = self.run(&sentences);
        write(&outcomes, BufWriter::new(File::create(output.as_ref())?))?;
        let stats = RunStats::from_outcomes(&outcomes);
        log::info!(
            "tagged {} sentences from {} in {:?} ({} unscoreable, {} empty)",
            stats.total(),
            input.as_ref().display(),
            begin.elapsed(),
            stats.unscoreable,
            stats.empty
        );
        Ok(stats)
    }
}

/// Writes one line per outcome.
pub fn write<W: Write>(outcomes: &[Outcome], mut w: W) -> Result<()> {
    for outcome in outcomes {
        writeln!(w, "{outcome}")?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::HmmModel, tagger::HmmTagger};

    const MODEL: &str = "dog runs
q0 NN VB qN
NN
0,0.6,0.4,0
0,0.1,0.6,0.3
0,0.5,0.1,0.4
0,0,0,0
0,0
1,0
0,1
0,0
";

    fn sentences(text: &str) -> Vec<Sentence> {
        text.lines().map(Sentence::from).collect()
    }

    #[test]
    fn format_outcomes() {
        let model: HmmModel = MODEL.parse().unwrap();
        let tagger = HmmTagger::new(&model);
        let runner = Runner::new(&tagger);
        let outcomes = runner.run(&sentences("dog runs\n\nruns runs"));
        let mut buf = Vec::new();
        write(&outcomes, &mut buf).unwrap();
        // runs -> runs needs VB -> VB, then VB -> qN
        assert_eq!(String::from_utf8(buf).unwrap(), "dog/NN runs/VB\n\nruns/VB runs/VB\n");
        assert_eq!(
            RunStats::from_outcomes(&outcomes),
            RunStats { tagged: 2, unscoreable: 0, empty: 1 }
        );
    }

    #[test]
    fn unscoreable_does_not_abort() {
        let model: HmmModel = MODEL.replacen("\nNN\n", "\n\n", 1).parse().unwrap();
        let tagger = HmmTagger::new(&model);
        let outcomes = Runner::new(&tagger).run(&sentences("dog cat\ndog"));
        assert_eq!(
            outcomes[0],
            Outcome::Unscoreable { words: vec!["dog".into(), "cat".into()] }
        );
        assert_eq!(outcomes[0].to_string(), "dog/ cat/");
        assert_eq!(outcomes[1].to_string(), "dog/NN");
        let stats = RunStats::from_outcomes(&outcomes);
        assert_eq!(stats.unscoreable, 1);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn parallel_keeps_order() {
        let model: HmmModel = MODEL.parse().unwrap();
        let tagger = HmmTagger::new(&model);
        let input = sentences(&"dog runs\nruns dog\ncat\n".repeat(50));
        let sequential = Runner::new(&tagger).run(&input);
        let parallel = Runner::new(&tagger).parallel(true).run(&input);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.len(), 150);
    }
}

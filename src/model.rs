use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use crate::{
    error::{Error, Result},
    quark::{Quark, StringTable, TextVectorizer},
};

pub const START_TAG: &str = "q0";
pub const END_TAG: &str = "qN";

const STOCHASTIC_TOLERANCE: f64 = 1e-6;

/// Trained HMM parameters.
///
/// Matrices are stored row-major as natural logarithms, computed once at load
/// time: `log_trans[num_tags * from + to]` and `log_emit[num_columns * tag + column]`.
/// A zero probability becomes negative infinity.
///
/// Emission columns follow the raw tokens of the vocabulary line. A repeated
/// word still owns a column, but lookups resolve to its first occurrence.
#[derive(Debug, Clone)]
pub struct HmmModel {
    vocab: Quark,
    tags: Quark,
    open: Vec<bool>,
    start: usize,
    end: usize,
    /// Emission column of each vocabulary id.
    columns: Vec<usize>,
    num_columns: usize,
    log_trans: Vec<f64>,
    log_emit: Vec<f64>,
}

impl HmmModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref())?;
        let model = Self::from_reader(BufReader::new(f))?;
        log::info!(
            "loaded model from {}: transition {}x{}, emission {}x{}",
            path.as_ref().display(),
            model.num_tags(),
            model.num_tags(),
            model.num_tags(),
            model.num_words()
        );
        Ok(model)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Self::from_lines(&lines)
    }

    fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let line = |i: usize| nth_line(lines, i);

        let mut vocab = Quark::default();
        let mut columns = Vec::new();
        let mut num_columns = 0;
        for (pos, word) in line(0)?.split_whitespace().enumerate() {
            if vocab.find_or_insert(word) == columns.len() {
                columns.push(pos);
            }
            num_columns += 1;
        }

        let mut tags = Quark::default();
        for label in line(1)?.split_whitespace() {
            if tags.contains(label) {
                return Err(Error::malformed(2, format!("duplicate tag {label:?}")));
            }
            tags.find_or_insert(label);
        }
        let start = tags
            .to_id(START_TAG)
            .ok_or_else(|| Error::malformed(2, format!("missing start tag {START_TAG:?}")))?;
        let end = tags
            .to_id(END_TAG)
            .ok_or_else(|| Error::malformed(2, format!("missing end tag {END_TAG:?}")))?;

        let mut open = vec![false; tags.len()];
        for label in line(2)?.split_whitespace() {
            match tags.to_id(label) {
                Some(i) => open[i] = true,
                None => log::warn!("open tag {label:?} is not in the tag set, ignored"),
            }
        }

        let num_tags = tags.len();
        let mut trans = Vec::with_capacity(num_tags * num_tags);
        for i in 0..num_tags {
            let n = 3 + i;
            trans.extend(parse_row(line(n)?, num_tags, n + 1)?);
        }
        let mut emit = Vec::with_capacity(num_tags * num_columns);
        for i in 0..num_tags {
            let n = 3 + num_tags + i;
            emit.extend(parse_row(line(n)?, num_columns, n + 1)?);
        }

        for from in 0..num_tags {
            if from == end {
                continue;
            }
            let sum: f64 = trans[num_tags * from..num_tags * (from + 1)].iter().sum();
            if (sum - 1.0).abs() > STOCHASTIC_TOLERANCE {
                log::warn!(
                    "transition row for {:?} sums to {sum}, expected 1",
                    tags.to_str(from).unwrap_or_default()
                );
            }
        }

        let log_trans = trans.iter().map(|p| p.ln()).collect();
        let log_emit = emit.iter().map(|p| p.ln()).collect();
        Ok(Self {
            vocab,
            tags,
            open,
            start,
            end,
            columns,
            num_columns,
            log_trans,
            log_emit,
        })
    }

    pub fn tags(&self) -> &Quark {
        &self.tags
    }

    pub fn vocab(&self) -> &Quark {
        &self.vocab
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn num_words(&self) -> usize {
        self.vocab.len()
    }

    /// Index of the start sentinel `q0`.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the end sentinel `qN`.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_sentinel(&self, tag: usize) -> bool {
        tag == self.start || tag == self.end
    }

    /// Whether `tag` may explain out-of-vocabulary words.
    pub fn is_open(&self, tag: usize) -> bool {
        self.open[tag]
    }

    pub fn open_tags(&self) -> impl Iterator<Item = &str> {
        self.open
            .iter()
            .enumerate()
            .filter(|(_, o)| **o)
            .filter_map(|(i, _)| self.tags.to_str(i))
    }

    pub fn transition(&self, from: usize, to: usize) -> f64 {
        self.log_transition(from, to).exp()
    }

    /// `word` is a vocabulary id as returned by [`HmmModel::vocab`].
    pub fn emission(&self, tag: usize, word: usize) -> f64 {
        self.log_emission(tag, word).exp()
    }

    pub fn log_transition(&self, from: usize, to: usize) -> f64 {
        self.log_trans[self.num_tags() * from + to]
    }

    pub fn log_emission(&self, tag: usize, word: usize) -> f64 {
        self.log_emit[self.num_columns * tag + self.columns[word]]
    }
}

impl FromStr for HmmModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_lines(&s.lines().collect::<Vec<_>>())
    }
}

fn nth_line<S: AsRef<str>>(lines: &[S], i: usize) -> Result<&str> {
    lines
        .get(i)
        .map(S::as_ref)
        .ok_or_else(|| Error::malformed(i + 1, "unexpected end of file"))
}

fn parse_row(line: &str, expected: usize, lineno: usize) -> Result<Vec<f64>> {
    let line = line.trim();
    if line.is_empty() {
        return if expected == 0 {
            Ok(Vec::new())
        } else {
            Err(Error::malformed(lineno, format!("expected {expected} values, found none")))
        };
    }
    let row = line
        .split(',')
        .map(|s| {
            let s = s.trim();
            let p: f64 = s
                .parse()
                .map_err(|_| Error::malformed(lineno, format!("invalid probability {s:?}")))?;
            if !p.is_finite() || p < 0.0 {
                return Err(Error::malformed(lineno, format!("probability out of range: {s}")));
            }
            Ok(p)
        })
        .collect::<Result<Vec<_>>>()?;
    if row.len() != expected {
        return Err(Error::malformed(
            lineno,
            format!("expected {expected} values, found {}", row.len()),
        ));
    }
    Ok(row)
}

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::Result;

/// One untagged input line, split on whitespace.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sentence {
    pub words: Vec<String>,
}

impl From<&str> for Sentence {
    fn from(line: &str) -> Self {
        Self {
            words: line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl Sentence {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// One line of `word/tag` tokens.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaggedSentence {
    pub words: Vec<String>,
    pub tags: Vec<String>,
}

impl TaggedSentence {
    /// Splits every token at its final `/`. A token without one is used as
    /// both word and tag.
    pub fn parse(line: &str) -> Self {
        let mut this = Self::default();
        for token in line.split_whitespace() {
            match token.rsplit_once('/') {
                Some((word, tag)) => this.push(word, tag),
                None => this.push(token, token),
            }
        }
        this
    }

    pub fn push(&mut self, word: &str, tag: &str) {
        self.words.push(word.to_string());
        self.tags.push(tag.to_string());
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Reads one sentence per line. Blank lines are kept as empty sentences so
/// that line numbers stay aligned with the file.
pub fn read_sentences<P: AsRef<Path>>(path: P) -> Result<Vec<Sentence>> {
    sentences_from_reader(BufReader::new(File::open(path)?))
}

pub fn sentences_from_reader<R: BufRead>(reader: R) -> Result<Vec<Sentence>> {
    let mut v = Vec::new();
    for line in reader.lines() {
        v.push(Sentence::from(line?.as_str()));
    }
    Ok(v)
}

pub fn read_tagged<P: AsRef<Path>>(path: P) -> Result<Vec<TaggedSentence>> {
    tagged_from_reader(BufReader::new(File::open(path)?))
}

pub fn tagged_from_reader<R: BufRead>(reader: R) -> Result<Vec<TaggedSentence>> {
    let mut v = Vec::new();
    for line in reader.lines() {
        v.push(TaggedSentence::parse(&line?));
    }
    Ok(v)
}

use std::collections::HashMap;

/// Read-only lookup between labels and their dense indices.
pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, s: &str) -> bool {
        self.to_id(s).is_some()
    }
}

pub trait TextVectorizer {
    fn find_or_insert(&mut self, key: &str) -> usize;
}

/// Insertion-ordered string table, used for both the vocabulary and the tag set.
///
/// A repeated key keeps the index of its first occurrence.
#[derive(Debug, Default, Clone)]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl<S: AsRef<str>> FromIterator<S> for Quark {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut quark = Quark::default();
        for s in iter {
            quark.find_or_insert(s.as_ref());
        }
        quark
    }
}

impl StringTable for Quark {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl TextVectorizer for Quark {
    fn find_or_insert(&mut self, key: &str) -> usize {
        if let Some(&idx) = self.m.get(key) {
            return idx;
        }
        let idx = self.v.len();
        self.m.insert(key.to_string(), idx);
        self.v.push(key.to_string());
        idx
    }
}

impl Quark {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.v.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_str() {
        let mut quark = Quark::default();
        for (s, id) in [("zero", 0), ("one", 1), ("two", 2), ("three", 3), ("two", 2), ("one", 1), ("zero", 0), ("four", 4)] {
            assert_eq!(id, quark.find_or_insert(s), "{} != {}", s, id);
        }
        assert_eq!(quark.len(), 5);
    }

    #[test]
    fn find_by_id() {
        let quark: Quark = ["zero", "one"].into_iter().collect();
        assert_eq!(quark.to_str(0), Some("zero"));
        assert_eq!(quark.to_str(1), Some("one"));
        assert_eq!(quark.to_str(2), None);
    }

    #[test]
    fn duplicates_keep_first_index() {
        let quark: Quark = ["a", "b", "a", "c"].into_iter().collect();
        assert_eq!(quark.to_id("a"), Some(0));
        assert_eq!(quark.to_id("c"), Some(2));
        assert!(quark.contains("b"));
        assert!(!quark.contains("d"));
        assert_eq!(quark.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}

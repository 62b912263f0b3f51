use std::path::Path;

use futures::StreamExt;
use log::{debug, info};
use tokio::fs::File;
use tokio_util::codec::{FramedRead, LinesCodec};

use crate::error::WordSourceError;

pub const DEFAULT_DICTIONARY: &str = "/usr/share/dict/words";

pub const INSTALL_HINT: &str = "\
Ensure the dictionary file exists and is readable.
For Linux, install 'wamerican' with:
  sudo apt-get install wamerican
For macOS, install a dictionary with Homebrew:
  brew install wordnet";

// Exclusive bounds on word length, in chars.
const MIN_LEN: usize = 3;
const MAX_LEN: usize = 12;

const ADJECTIVE_SUFFIXES: [&str; 2] = ["y", "ous"];
const NOUN_SUFFIXES: [&str; 3] = ["er", "ion", "ist"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    Adjective,
    Noun,
}

/// Guess the part of speech of a lowercase word from its suffix.
///
/// Words outside the length window, or with no recognised suffix, are
/// discarded.
pub fn classify(word: &str) -> Option<WordKind> {
    let len = word.chars().count();
    if len <= MIN_LEN || len >= MAX_LEN {
        return None;
    }

    if ADJECTIVE_SUFFIXES.iter().any(|suffix| word.ends_with(suffix)) {
        Some(WordKind::Adjective)
    } else if NOUN_SUFFIXES.iter().any(|suffix| word.ends_with(suffix)) {
        Some(WordKind::Noun)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet {
    adjectives: Vec<String>,
    nouns: Vec<String>,
}

impl WordSet {
    /// Take adjective and noun lists as given, without suffix classification.
    pub fn new(adjectives: Vec<String>, nouns: Vec<String>) -> Self {
        let lower = |words: Vec<String>| -> Vec<String> {
            words.into_iter().map(|word| word.to_lowercase()).collect()
        };
        Self {
            adjectives: lower(adjectives),
            nouns: lower(nouns),
        }
        .deduped()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for word in words {
            set.push(word.as_ref());
        }
        set.deduped()
    }

    /// Read a newline-delimited word list and classify every line.
    pub async fn load(path: &Path) -> Result<Self, WordSourceError> {
        let file = File::open(path).await.map_err(|source| WordSourceError::Open {
            path: path.to_owned(),
            source,
        })?;

        let mut lines = FramedRead::new(file, LinesCodec::new());
        let mut set = Self::default();
        let mut scanned = 0usize;

        while let Some(line) = lines.next().await {
            let line = line.map_err(|source| WordSourceError::Read {
                path: path.to_owned(),
                source,
            })?;
            scanned += 1;
            set.push(&line);
        }
        let set = set.deduped();

        debug!("Scanned {scanned} lines from {}", path.display());
        info!(
            "Loaded {} adjectives and {} nouns from {}",
            set.adjectives.len(),
            set.nouns.len(),
            path.display()
        );

        Ok(set)
    }

    fn push(&mut self, word: &str) {
        let word = word.to_lowercase();
        match classify(&word) {
            Some(WordKind::Adjective) => self.adjectives.push(word),
            Some(WordKind::Noun) => self.nouns.push(word),
            None => {}
        }
    }

    /// Sort both lists and drop repeats such as "August" and "august".
    fn deduped(mut self) -> Self {
        for list in [&mut self.adjectives, &mut self.nouns] {
            list.sort_unstable();
            list.dedup();
        }
        self
    }

    pub fn adjectives(&self) -> &[String] {
        &self.adjectives
    }

    pub fn nouns(&self) -> &[String] {
        &self.nouns
    }

    pub fn len(&self) -> usize {
        self.adjectives.len() + self.nouns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

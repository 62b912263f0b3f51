use std::collections::HashSet;

use log::{debug, warn};

use crate::error::GenerateError;
use crate::words::WordSet;

/// Picks tried while building a single suggestion.
pub const MAX_PICK_ATTEMPTS: usize = 100;

/// Upper bound of the random word target per suggestion.
pub const MAX_WORDS_PER_SUGGESTION: usize = 5;

/// Consecutive rejected candidates after which a call gives up.
///
/// The combination ceiling only stops the loop once `adjectives × nouns`
/// keys are used, which a tight length budget can make unreachable.
pub const MAX_FRUITLESS_ROUNDS: usize = 1000;

/// Source of randomness for the generator.
pub trait RandomSource {
    /// Uniform value in `0..bound`. `bound` is never zero.
    fn below(&mut self, bound: usize) -> usize;

    fn coin(&mut self) -> bool;

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

impl RandomSource for fastrand::Rng {
    fn below(&mut self, bound: usize) -> usize {
        self.usize(..bound)
    }

    fn coin(&mut self) -> bool {
        self.bool()
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        fastrand::Rng::shuffle(self, items)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_pick_attempts: usize,
    pub max_words_per_suggestion: usize,
    pub max_fruitless_rounds: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_pick_attempts: MAX_PICK_ATTEMPTS,
            max_words_per_suggestion: MAX_WORDS_PER_SUGGESTION,
            max_fruitless_rounds: MAX_FRUITLESS_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub name: String,
    pub count: usize,
    pub alliteration: bool,
    pub max_length: usize,
}

struct Candidate<'w> {
    suggestion: String,
    words: Vec<&'w str>,
}

impl Candidate<'_> {
    /// Sorted, space-joined appended words. Order of appending does not matter.
    fn key(&self) -> String {
        let mut words = self.words.clone();
        words.sort_unstable();
        words.join(" ")
    }
}

pub struct NameGenerator<R> {
    rng: R,
    limits: Limits,
}

impl<R: RandomSource> NameGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self::with_limits(rng, Limits::default())
    }

    pub fn with_limits(rng: R, limits: Limits) -> Self {
        Self { rng, limits }
    }

    /// Produce up to `request.count` suggestions with pairwise distinct word
    /// combinations.
    ///
    /// A bare name with no appended word never counts as a suggestion. The
    /// result is shorter than requested when the word space runs out.
    pub fn generate(
        &mut self,
        request: &GenerationRequest,
        words: &WordSet,
    ) -> Result<Vec<String>, GenerateError> {
        let initial = initial_of(&request.name).ok_or(GenerateError::EmptyName)?;

        let (mut adjectives, mut nouns) = if request.alliteration {
            let adjectives = filter_by_initial(words.adjectives(), initial);
            let nouns = filter_by_initial(words.nouns(), initial);
            if adjectives.is_empty() || nouns.is_empty() {
                warn!(
                    "No alliterative words for '{initial}' ({} adjectives, {} nouns)",
                    adjectives.len(),
                    nouns.len()
                );
                return Err(GenerateError::NoAlliterativeWords(initial));
            }
            (adjectives, nouns)
        } else {
            (
                words.adjectives().iter().map(String::as_str).collect::<Vec<_>>(),
                words.nouns().iter().map(String::as_str).collect::<Vec<_>>(),
            )
        };

        let name_len = request.name.chars().count();
        if name_len >= request.max_length || (adjectives.is_empty() && nouns.is_empty()) {
            debug!(
                "Nothing fits after '{}' within {} chars",
                request.name, request.max_length
            );
            return Ok(Vec::new());
        }

        self.rng.shuffle(&mut adjectives);
        self.rng.shuffle(&mut nouns);

        let ceiling = adjectives.len().saturating_mul(nouns.len());
        let mut suggestions = Vec::new();
        let mut used_combinations = HashSet::new();
        let mut fruitless = 0;

        while suggestions.len() < request.count {
            let candidate = self.build_candidate(request, name_len, &adjectives, &nouns);

            let accepted = !candidate.words.is_empty()
                && candidate.suggestion.chars().count() <= request.max_length
                && used_combinations.insert(candidate.key());

            if accepted {
                suggestions.push(candidate.suggestion);
                fruitless = 0;
            } else {
                fruitless += 1;
                if fruitless >= self.limits.max_fruitless_rounds {
                    debug!("Giving up after {fruitless} rejected candidates");
                    break;
                }
            }

            if used_combinations.len() >= ceiling {
                debug!("Combination ceiling of {ceiling} reached");
                break;
            }
        }

        debug!(
            "Generated {}/{} suggestions for '{}' (alliteration: {}, max length: {})",
            suggestions.len(),
            request.count,
            request.name,
            request.alliteration,
            request.max_length
        );

        Ok(suggestions)
    }

    fn build_candidate<'w>(
        &mut self,
        request: &GenerationRequest,
        name_len: usize,
        adjectives: &[&'w str],
        nouns: &[&'w str],
    ) -> Candidate<'w> {
        let available = adjectives.len() + nouns.len();
        let target = 1 + self.rng.below(self.limits.max_words_per_suggestion.max(1));

        let mut suggestion = request.name.clone();
        let mut length = name_len;
        let mut used: Vec<&'w str> = Vec::new();
        let mut attempts = 0;

        while length < request.max_length
            && attempts < self.limits.max_pick_attempts
            && used.len() < target
            && used.len() < available
        {
            attempts += 1;

            let word = self.pick(adjectives, nouns);
            if used.contains(&word) {
                continue;
            }

            let titled = title_case(word);
            let titled_len = titled.chars().count();
            if length + titled_len <= request.max_length {
                suggestion.push_str(&titled);
                length += titled_len;
                used.push(word);
            }
        }

        Candidate { suggestion, words: used }
    }

    fn pick<'w>(&mut self, adjectives: &[&'w str], nouns: &[&'w str]) -> &'w str {
        let list = match (adjectives.is_empty(), nouns.is_empty()) {
            (false, false) => {
                if self.rng.coin() {
                    adjectives
                } else {
                    nouns
                }
            }
            (false, true) => adjectives,
            _ => nouns,
        };

        list[self.rng.below(list.len())]
    }
}

fn initial_of(name: &str) -> Option<char> {
    name.chars().next().and_then(|c| c.to_lowercase().next())
}

fn filter_by_initial(words: &[String], initial: char) -> Vec<&str> {
    words
        .iter()
        .map(String::as_str)
        .filter(|word| word.starts_with(initial))
        .collect()
}

/// Uppercase the first character, leave the rest alone.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! The vocabulary that secrets are drawn from and guesses are checked against.

use std::{collections::HashSet, ops::Deref};

use crate::{DictionaryError, PuzzleError};

mod list;
pub use list::WORDS;

/// The word length of the built-in vocabulary.
pub const WORD_LEN: usize = 5;

/// An immutable, ordered list of words with a set view for membership tests.
///
/// Every entry has the same length and consists only of the letters `a`
/// through `z`. A [`Dictionary`] is built once and never altered, so games
/// and guessers can borrow it freely.
///
/// # Examples
///
/// ```rust
/// use wordle_kata::words::Dictionary;
///
/// let dictionary = Dictionary::builtin();
/// assert_eq!(dictionary.word_len(), 5);
/// assert!(dictionary.contains("arose"));
/// assert!(!dictionary.contains("abcde"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<String>,
    word_set: HashSet<String>,
    word_len: usize,
}

impl Dictionary {
    /// Builds a dictionary whose entries must all be `word_len` letters long.
    ///
    /// Duplicate entries are dropped, keeping the position of the first one.
    pub fn new<I, S>(words: I, word_len: usize) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut word_set = HashSet::new();

        for word in words {
            let word = word.into();
            if word.chars().count() != word_len {
                return Err(DictionaryError::WrongLength { word, word_len });
            }
            if !word.chars().all(|c| c.is_ascii_lowercase()) {
                return Err(DictionaryError::InvalidCharacter(word));
            }
            if word_set.insert(word.clone()) {
                ordered.push(word);
            }
        }

        if ordered.is_empty() {
            return Err(DictionaryError::Empty);
        }

        Ok(Dictionary {
            words: ordered,
            word_set,
            word_len,
        })
    }

    /// Builds the dictionary from the built-in [`WORDS`] list.
    pub fn builtin() -> Self {
        Dictionary {
            words: WORDS.iter().map(|w| w.to_string()).collect(),
            word_set: WORDS.iter().map(|w| w.to_string()).collect(),
            word_len: WORD_LEN,
        }
    }

    /// Returns the word at `index`.
    ///
    /// No wrapping is performed; an index past the end is an error.
    pub fn word_at(&self, index: usize) -> Result<&str, PuzzleError> {
        self.words
            .get(index)
            .map(String::as_str)
            .ok_or(PuzzleError::InvalidIndex(index))
    }

    /// Checks whether `word` is in the vocabulary. The match is exact and
    /// case-sensitive.
    pub fn contains(&self, word: &str) -> bool {
        self.word_set.contains(word)
    }

    /// The length shared by every word.
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// The words in the order they were given.
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Deref for Dictionary {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.words
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin_list_is_well_formed() {
        let rebuilt = Dictionary::new(WORDS.iter().copied(), WORD_LEN).unwrap();
        assert_eq!(rebuilt, Dictionary::builtin());
        assert!(WORDS.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn word_at_does_not_wrap() {
        let dictionary = Dictionary::new(["arose", "chaos"], 5).unwrap();
        assert_eq!(dictionary.word_at(1).unwrap(), "chaos");
        assert!(matches!(
            dictionary.word_at(2),
            Err(PuzzleError::InvalidIndex(2))
        ));
    }

    #[test]
    fn contains_is_exact() {
        let dictionary = Dictionary::new(["arose"], 5).unwrap();
        assert!(dictionary.contains("arose"));
        assert!(!dictionary.contains("AROSE"));
        assert!(!dictionary.contains("aros"));
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(matches!(
            Dictionary::new(["arose", "toolong"], 5),
            Err(DictionaryError::WrongLength { .. })
        ));
        assert!(matches!(
            Dictionary::new(["Arose"], 5),
            Err(DictionaryError::InvalidCharacter(_))
        ));
        assert!(matches!(
            Dictionary::new(Vec::<String>::new(), 5),
            Err(DictionaryError::Empty)
        ));
    }

    #[test]
    fn drops_duplicates_in_order() {
        let dictionary = Dictionary::new(["chaos", "arose", "chaos"], 5).unwrap();
        assert_eq!(dictionary.words(), &["chaos", "arose"]);
    }

    #[test]
    fn other_lengths() {
        let dictionary = Dictionary::new(["cat", "dog"], 3).unwrap();
        assert_eq!(dictionary.word_len(), 3);
        assert_eq!(dictionary.len(), 2);
    }
}

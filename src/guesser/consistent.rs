//! A simple guesser that only plays words that could still be the secret.

use std::fmt::Display;

use serde_json::Value;

use crate::{
    game::{Guess, Score},
    guesser::Guesser,
    GuesserError,
};

/// A guesser that plays the first word that could be the secret.
///
/// `Consistent` walks the vocabulary in order and picks the first word it has
/// not tried yet that would have produced every score seen so far if it were
/// the secret. It learns nothing about letter frequencies, so it mostly
/// exists to give the harness something reasonable to run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Consistent {
    first_word: Option<String>,
}

impl Consistent {
    pub const fn new() -> Self {
        Consistent { first_word: None }
    }

    /// Always opens with `word`.
    pub fn first_word(self, word: impl Into<String>) -> Self {
        Consistent {
            first_word: Some(word.into()),
        }
    }

    fn could_be_secret(candidate: &str, guesses: &[Guess]) -> bool {
        guesses.iter().all(|guess| {
            guess.word != candidate && Score::compute(candidate, &guess.word) == guess.score
        })
    }
}

impl Guesser for Consistent {
    fn guess_word(&self, vocabulary: &[String], guesses: &[Guess]) -> Result<Value, GuesserError> {
        if guesses.is_empty() {
            if let Some(word) = &self.first_word {
                return Ok(Value::from(word.as_str()));
            }
        }

        vocabulary
            .iter()
            .find(|candidate| Self::could_be_secret(candidate, guesses))
            .or_else(|| {
                vocabulary
                    .iter()
                    .find(|candidate| guesses.iter().all(|g| &g.word != *candidate))
            })
            .map(|word| Value::from(word.as_str()))
            .ok_or_else(|| GuesserError::Malformed("no words left to try".to_string()))
    }
}

impl Display for Consistent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wordle_kata::Consistent")?;
        if let Some(word) = &self.first_word {
            write!(f, " (start: {})", word)?;
        }
        Ok(())
    }
}

use std::{collections::HashMap, fmt::Display};

use itertools::Itertools;
use serde_json::Value;

use wordle_kata::{exportable, game::Score, Guess, Guesser, GuesserError};

/// A guesser that prefers words made of common letters.
///
/// Each round, it counts how many words of the vocabulary contain each
/// letter, then plays the word that could still be the secret (given every
/// score so far) whose distinct letters are the most common.
#[exportable(name = common, new = new)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Common;

impl Common {
    /// Creates the guesser.
    pub const fn new() -> Self {
        Common
    }

    fn letter_counts(vocabulary: &[String]) -> HashMap<char, u32> {
        let mut counts = HashMap::new();
        vocabulary
            .iter()
            .flat_map(|word| word.chars().unique())
            .for_each(|c| *counts.entry(c).or_insert(0) += 1);
        counts
    }

    fn weight(word: &str, counts: &HashMap<char, u32>) -> u32 {
        word.chars()
            .unique()
            .map(|c| counts.get(&c).copied().unwrap_or(0))
            .sum()
    }
}

impl Guesser for Common {
    fn guess_word(&self, vocabulary: &[String], guesses: &[Guess]) -> Result<Value, GuesserError> {
        let counts = Self::letter_counts(vocabulary);

        vocabulary
            .iter()
            .filter(|candidate| {
                guesses.iter().all(|guess| {
                    &guess.word != *candidate
                        && Score::compute(candidate, &guess.word) == guess.score
                })
            })
            // earlier words win ties
            .rev()
            .max_by_key(|candidate| Self::weight(candidate, &counts))
            .map(|word| Value::from(word.as_str()))
            .ok_or_else(|| GuesserError::Malformed("no word fits every score".to_string()))
    }
}

impl Display for Common {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wordle_guessers::Common")
    }
}

#[cfg(test)]
mod test {
    use wordle_kata::{Dictionary, Game};

    use super::*;

    fn play<'a>(dictionary: &'a Dictionary, secret: &str) -> Game<'a> {
        let mut game = Game::new(dictionary, secret).unwrap();
        while !game.is_game_over() {
            let reply = Common::new().guess_word(dictionary, game.history()).unwrap();
            game.submit_value(&reply).unwrap();
        }
        game
    }

    #[test]
    fn prefers_common_letters() {
        let dictionary = Dictionary::new(["fuzzy", "eerie", "arose"], 5).unwrap();
        assert_eq!(
            Common::new().guess_word(&dictionary, &[]).unwrap(),
            Value::from("arose")
        );
    }

    #[test]
    fn ties_go_to_the_earlier_word() {
        let dictionary = Dictionary::new(["abcde", "edcba"], 5).unwrap();
        assert_eq!(
            Common::new().guess_word(&dictionary, &[]).unwrap(),
            Value::from("abcde")
        );
    }

    #[test]
    fn only_plays_possible_secrets() {
        let dictionary = Dictionary::builtin();
        for secret in ["youth", "chest", "float", "proof"] {
            let game = play(&dictionary, secret);
            for (i, guess) in game.history().iter().enumerate() {
                let earlier = &game.history()[..i];
                assert!(earlier.iter().all(|g| {
                    g.word != guess.word && Score::compute(&guess.word, &g.word) == g.score
                }));
            }
        }
    }

    #[test]
    fn solves_small_vocabulary() {
        let dictionary =
            Dictionary::new(["arose", "chaos", "proof", "tests", "pests", "chest"], 5).unwrap();
        for secret in dictionary.words() {
            assert!(play(&dictionary, secret).num_guesses_to_win() > 0);
        }
    }
}

//! The game state and scoring engine.

use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
#[cfg(not(target_family = "wasm"))]
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{words::Dictionary, PuzzleError};

/// The number of guesses a game allows unless configured otherwise.
pub const MAX_GUESSES: usize = 6;

/// The verdict for a single letter of a guess.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Mark {
    /// The letter is in the secret at this position. Written `+`.
    Correct,

    /// The letter is in the secret somewhere else. Written `/`.
    Present,

    /// The letter is not in the secret, or every occurrence of it is already
    /// matched elsewhere. Written `x`.
    Absent,
}

impl Mark {
    pub fn to_char(self) -> char {
        match self {
            Mark::Correct => '+',
            Mark::Present => '/',
            Mark::Absent => 'x',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Mark::Correct),
            '/' => Some(Mark::Present),
            'x' => Some(Mark::Absent),
            _ => None,
        }
    }
}

/// The per-letter score of one guess, in guess order.
///
/// A score is written as a string over `+`, `/` and `x`, and that is also
/// how it serializes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Score {
    marks: Vec<Mark>,
}

impl Score {
    /// Scores `guess` against `secret`. Both must have the same length.
    ///
    /// Each position is judged on its own:
    ///
    /// 1. a letter equal to the secret's letter there is [`Mark::Correct`];
    /// 2. a letter the secret does not contain is [`Mark::Absent`];
    /// 3. otherwise the letter is [`Mark::Present`] if the secret has it at
    ///    some position the guess does not already match with that same
    ///    letter, and [`Mark::Absent`] if not.
    ///
    /// Nothing is consumed between positions, so a letter repeated in the
    /// guess can be marked present more often than it occurs in the secret.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wordle_kata::game::Score;
    ///
    /// assert_eq!(Score::compute("arose", "roast").to_string(), "///+x");
    /// assert_eq!(Score::compute("arose", "proof").to_string(), "x++xx");
    /// ```
    pub fn compute(secret: &str, guess: &str) -> Self {
        let secret = secret.as_bytes();
        let guess = guess.as_bytes();
        debug_assert_eq!(secret.len(), guess.len());

        let marks = guess
            .iter()
            .zip(secret)
            .map(|(&letter, &answer)| {
                if letter == answer {
                    Mark::Correct
                } else if !secret.contains(&letter) {
                    Mark::Absent
                } else if secret
                    .iter()
                    .zip(guess)
                    .any(|(&s, &g)| s == letter && g != letter)
                {
                    Mark::Present
                } else {
                    Mark::Absent
                }
            })
            .collect();

        Score { marks }
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Returns true when every letter is [`Mark::Correct`].
    pub fn is_win(&self) -> bool {
        !self.marks.is_empty() && self.marks.iter().all(|&m| m == Mark::Correct)
    }
}

impl FromIterator<Mark> for Score {
    fn from_iter<T: IntoIterator<Item = Mark>>(iter: T) -> Self {
        Score {
            marks: iter.into_iter().collect(),
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.marks.iter().map(|m| m.to_char()).join(""))
    }
}

impl FromStr for Score {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| Mark::from_char(c).ok_or_else(|| format!("invalid mark '{}'", c)))
            .collect()
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A submitted word together with its score.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Guess {
    pub word: String,
    pub score: Score,
}

impl Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.word, self.score)
    }
}

/// Where a [`Game`] is in its life.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

/// One play-through against a fixed secret word.
///
/// A game starts [`InProgress`](GameState::InProgress) with no guesses. Each
/// successful [`submit()`](Game::submit()) appends one [`Guess`]. The game is
/// won as soon as a guess scores all [`Mark::Correct`], and lost when the
/// guess limit is reached without that. Both are final.
///
/// # Examples
///
/// ```rust
/// use wordle_kata::{game::GameState, Dictionary, Game};
///
/// let dictionary = Dictionary::builtin();
/// let mut game = Game::new(&dictionary, "arose")?;
///
/// let guesses = game.submit("prose")?;
/// assert_eq!(guesses[0].score.to_string(), "x++++");
///
/// game.submit("arose")?;
/// assert_eq!(game.state(), GameState::Won);
/// assert_eq!(game.num_guesses_to_win(), 2);
/// assert!(game.submit("chaos").is_err());
/// #
/// # Ok::<_, wordle_kata::PuzzleError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Game<'d> {
    dictionary: &'d Dictionary,
    secret: String,
    history: Vec<Guess>,
    max_guesses: usize,
}

impl<'d> Game<'d> {
    /// Creates a game for `secret`, which must be in `dictionary`.
    pub fn new(dictionary: &'d Dictionary, secret: &str) -> Result<Self, PuzzleError> {
        if !dictionary.contains(secret) {
            return Err(PuzzleError::InvalidWord(secret.to_string()));
        }

        Ok(Game {
            dictionary,
            secret: secret.to_string(),
            history: Vec::new(),
            max_guesses: MAX_GUESSES,
        })
    }

    /// Creates a game for the next secret handed out by `cursor`.
    pub fn from_cursor(
        dictionary: &'d Dictionary,
        cursor: &mut SecretCursor,
    ) -> Result<Self, PuzzleError> {
        let secret = cursor.next_secret(dictionary)?;
        Self::new(dictionary, secret)
    }

    /// Sets how many guesses the game allows.
    ///
    /// The limit must be at least 1 and no lower than the number of guesses
    /// already made, otherwise [`PuzzleError::InvalidLimit`] is returned.
    pub fn with_max_guesses(self, max_guesses: usize) -> Result<Self, PuzzleError> {
        if max_guesses == 0 || max_guesses < self.history.len() {
            return Err(PuzzleError::InvalidLimit(max_guesses));
        }

        Ok(Game {
            max_guesses,
            ..self
        })
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn max_guesses(&self) -> usize {
        self.max_guesses
    }

    pub fn word_len(&self) -> usize {
        self.dictionary.word_len()
    }

    pub fn dictionary(&self) -> &'d Dictionary {
        self.dictionary
    }

    /// Validates, scores and records a guess, then returns the whole history.
    ///
    /// The checks run in this order and the first failure wins:
    ///
    /// 1. the game is not over ([`PuzzleError::GameOver`]);
    /// 2. the guess has the vocabulary's length ([`PuzzleError::WrongLength`]);
    /// 3. it only uses `a` to `z` ([`PuzzleError::InvalidCharacter`]);
    /// 4. it is in the vocabulary ([`PuzzleError::InvalidWord`]).
    ///
    /// A failed submission leaves the game untouched.
    pub fn submit(&mut self, word: &str) -> Result<&[Guess], PuzzleError> {
        self.ensure_in_progress()?;
        self.submit_inner(word)
    }

    /// Like [`submit()`](Game::submit()), but for a value of unknown type
    /// such as the reply of a guesser.
    ///
    /// Anything other than a string fails with [`PuzzleError::InvalidWord`]
    /// carrying the value's JSON text, after the game-over check.
    pub fn submit_value(&mut self, value: &Value) -> Result<&[Guess], PuzzleError> {
        self.ensure_in_progress()?;
        match value.as_str() {
            Some(word) => self.submit_inner(word),
            None => Err(PuzzleError::InvalidWord(value.to_string())),
        }
    }

    fn ensure_in_progress(&self) -> Result<(), PuzzleError> {
        if self.is_game_over() {
            Err(PuzzleError::GameOver)
        } else {
            Ok(())
        }
    }

    fn submit_inner(&mut self, word: &str) -> Result<&[Guess], PuzzleError> {
        let word_len = self.word_len();
        if word.chars().count() != word_len {
            return Err(PuzzleError::WrongLength(word_len));
        }
        if !word.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(PuzzleError::InvalidCharacter);
        }
        if !self.dictionary.contains(word) {
            return Err(PuzzleError::InvalidWord(word.to_string()));
        }

        self.history.push(Guess {
            word: word.to_string(),
            score: Score::compute(&self.secret, word),
        });

        Ok(&self.history)
    }

    pub fn state(&self) -> GameState {
        match self.history.last() {
            Some(last) if last.score.is_win() => GameState::Won,
            _ if self.history.len() >= self.max_guesses => GameState::Lost,
            _ => GameState::InProgress,
        }
    }

    /// Returns true once the game is won or out of guesses.
    pub fn is_game_over(&self) -> bool {
        self.state() != GameState::InProgress
    }

    /// The 1-based number of the first winning guess, or 0 if there is none.
    pub fn num_guesses_to_win(&self) -> usize {
        self.history
            .iter()
            .position(|guess| guess.score.is_win())
            .map_or(0, |i| i + 1)
    }

    /// A read-only view of the guesses so far.
    pub fn history(&self) -> &[Guess] {
        &self.history
    }

    /// An owned copy of the guesses so far. Changing it does not affect the
    /// game.
    pub fn guesses(&self) -> Vec<Guess> {
        self.history.clone()
    }
}

/// Hands out successive secrets from a [`Dictionary`].
///
/// The cursor belongs to whoever drives the games, so a batch of games
/// sweeps the vocabulary instead of repeating one word. It wraps back to the
/// start after the last word.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct SecretCursor {
    next: usize,
}

impl SecretCursor {
    pub fn new(start: usize) -> Self {
        SecretCursor { next: start }
    }

    /// Starts at a random position in `dictionary`.
    #[cfg(not(target_family = "wasm"))]
    pub fn random(dictionary: &Dictionary, rng: &mut impl Rng) -> Self {
        SecretCursor {
            next: rng.gen_range(0..dictionary.len()),
        }
    }

    /// Moves the cursor to `index`. An index past the end makes the next
    /// [`next_secret()`](SecretCursor::next_secret()) fail.
    pub fn reset(&mut self, index: usize) {
        self.next = index;
    }

    pub fn position(&self) -> usize {
        self.next
    }

    /// Returns the word under the cursor and advances it.
    pub fn next_secret<'d>(&mut self, dictionary: &'d Dictionary) -> Result<&'d str, PuzzleError> {
        let word = dictionary.word_at(self.next)?;
        self.next = (self.next + 1) % dictionary.len();
        Ok(word)
    }
}

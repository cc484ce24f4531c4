//! The boundary with player-supplied guessing code.

use std::fmt::{Debug, Display};

use serde_json::Value;

use crate::{game::Guess, GuesserError};

pub mod consistent;
pub use consistent::Consistent;

/// Trait defining a player's `guessWord` function.
///
/// A guesser is handed the whole vocabulary and the guesses made so far in
/// the current game, and replies with the next word to try. It never sees the
/// secret and cannot touch the [`Game`](crate::Game): the
/// [harness](crate::Harness) takes the reply and submits it.
///
/// The reply is a [`Value`] rather than a [`String`] because guessers are
/// untrusted and may be running outside of Rust's type system, like
/// [`WasmGuesser`](crate::wasm::WasmGuesser). A reply that is not a string is
/// rejected by the game as an invalid word.
///
/// # How to implement
///
/// Define a struct, give it a [`Display`] name without linebreaks, and
/// implement [`guess_word()`](Guesser::guess_word()).
///
/// ```rust
/// use std::fmt::Display;
///
/// use serde_json::Value;
/// use wordle_kata::{Guess, Guesser, GuesserError};
///
/// #[derive(Debug)]
/// struct Alphabetical;
///
/// impl Display for Alphabetical {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "Alphabetical")
///     }
/// }
///
/// impl Guesser for Alphabetical {
///     fn guess_word(&self, vocabulary: &[String], guesses: &[Guess]) -> Result<Value, GuesserError> {
///         let word = vocabulary.get(guesses.len()).ok_or(GuesserError::NotDefined)?;
///         Ok(Value::from(word.as_str()))
///     }
/// }
/// ```
pub trait Guesser: Display + Debug {
    /// Picks the next guess.
    fn guess_word(&self, vocabulary: &[String], guesses: &[Guess]) -> Result<Value, GuesserError>;
}

impl<G: Guesser + ?Sized> Guesser for Box<G> {
    fn guess_word(&self, vocabulary: &[String], guesses: &[Guess]) -> Result<Value, GuesserError> {
        (**self).guess_word(vocabulary, guesses)
    }
}

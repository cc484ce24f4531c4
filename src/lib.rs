#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]

use thiserror::Error;

pub mod words;
pub use words::Dictionary;

pub mod config;
pub use config::Config;

pub mod game;
pub use game::{Game, Guess};

pub mod guesser;
pub use guesser::Guesser;

#[cfg(not(target_family = "wasm"))]
pub mod render;
#[cfg(not(target_family = "wasm"))]
pub use render::{Action, Renderer};

#[cfg(not(target_family = "wasm"))]
pub mod harness;
#[cfg(not(target_family = "wasm"))]
pub use harness::{Harness, Record};

#[cfg(feature = "wasm_consumer")]
#[cfg(not(target_family = "wasm"))]
pub mod wasm;
#[cfg(feature = "wasm_consumer")]
#[cfg(not(target_family = "wasm"))]
pub use wasm::WasmGuesser;

#[cfg(all(target_family = "wasm", feature = "macro"))]
pub mod wasm_rt;

#[cfg(feature = "macro")]
pub use wordle_kata_macro::exportable;

#[cfg(test)]
mod mock;

pub type Result<T, E = WordleError> = std::result::Result<T, E>;

/// The errors that `wordle_kata` can produce.
#[derive(Debug, Error)]
pub enum WordleError {
    #[error("puzzle encountered error")]
    Puzzle {
        #[from]
        kind: PuzzleError,
    },

    #[error("the vocabulary is malformed")]
    Dictionary {
        #[from]
        kind: DictionaryError,
    },

    #[error("could not load configuration")]
    Config {
        #[from]
        kind: ConfigError,
    },

    #[error("the guesser failed")]
    Guesser {
        #[from]
        kind: GuesserError,
    },

    #[error("the test harness encountered an error")]
    Harness {
        #[from]
        kind: HarnessError,
    },
}

/// Failures raised by [`Game`] while validating and scoring a guess.
///
/// The messages are stable so that drivers can show them to players as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// The game is already won or out of guesses.
    #[error("Game over: no more guesses allowed")]
    GameOver,

    /// The guess is not a string or is not in the vocabulary.
    #[error("Invalid word: {0}")]
    InvalidWord(String),

    /// The guess does not have the vocabulary's word length.
    #[error("Guess should have exactly {0} characters")]
    WrongLength(usize),

    /// The guess contains something other than `a` to `z`.
    #[error("Guess can only contain 'a' to 'z'")]
    InvalidCharacter,

    /// The index does not correspond to a word in the vocabulary.
    #[error("the index {0} does not correspond to a word in the vocabulary")]
    InvalidIndex(usize),

    /// The guess limit is zero or below the number of guesses already made.
    #[error("a game cannot allow {0} guesses")]
    InvalidLimit(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    #[error("the vocabulary has no words")]
    Empty,

    #[error("the word \"{word}\" does not have {word_len} letters")]
    WrongLength { word: String, word_len: usize },

    #[error("the word \"{0}\" contains something other than 'a' to 'z'")]
    InvalidCharacter(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("trouble deserializing configuration")]
    Serde(#[from] serde_json::Error),

    #[error("max_guesses must be at least 1")]
    NoGuesses,
}

/// Failures at the boundary with player-supplied guessing code.
///
/// None of these can corrupt a [`Game`]; the harness catches them at the call
/// site and reports them.
#[derive(Debug, Error)]
pub enum GuesserError {
    #[error("guessWord function not defined")]
    NotDefined,

    #[error("guessWord panicked: {0}")]
    Panicked(String),

    #[error("guessWord returned a malformed reply: {0}")]
    Malformed(String),

    #[error("the guesser module failed")]
    Wasm(#[source] Box<dyn std::error::Error>),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("trouble serializing the record")]
    Serde(#[from] serde_json::Error),
}

use std::{
    cell::Cell,
    fmt::Display,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use serde_json::Value;

use crate::{Guess, Guesser, GuesserError};

/// A guesser that replays a fixed list of replies, one per guess of a game.
#[derive(Debug, Clone)]
pub(crate) struct Mock {
    replies: Option<Vec<Value>>,
    panic_on: Option<&'static str>,
    cancel_after: Option<(usize, Arc<AtomicBool>)>,
    calls: Cell<usize>,
}

impl Mock {
    pub(crate) fn new(replies: impl Into<Option<Vec<Value>>>) -> Self {
        Self {
            replies: replies.into(),
            panic_on: None,
            cancel_after: None,
            calls: Cell::new(0),
        }
    }

    /// Panics instead of replying whenever the previous guess was `word`.
    pub(crate) fn panic_after(self, word: &'static str) -> Self {
        Self {
            panic_on: Some(word),
            ..self
        }
    }

    /// Raises `flag` once `calls` replies have been given.
    pub(crate) fn cancel_after(self, calls: usize, flag: Arc<AtomicBool>) -> Self {
        Self {
            cancel_after: Some((calls, flag)),
            ..self
        }
    }
}

impl Guesser for Mock {
    fn guess_word(&self, _vocabulary: &[String], guesses: &[Guess]) -> Result<Value, GuesserError> {
        self.calls.set(self.calls.get() + 1);
        if let Some((n, flag)) = &self.cancel_after {
            if self.calls.get() >= *n {
                flag.store(true, Ordering::SeqCst);
            }
        }
        if let (Some(word), Some(last)) = (self.panic_on, guesses.last()) {
            if last.word == word {
                panic!("mock guesser gave up after {}", word);
            }
        }

        let replies = match &self.replies {
            None => vec!["proof", "chaos", "tests", "pests", "chest", "float"]
                .into_iter()
                .map(Value::from)
                .collect(),
            Some(v) => v.clone(),
        };

        replies
            .get(guesses.len())
            .cloned()
            .ok_or(GuesserError::NotDefined)
    }
}

impl Display for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mock {:?}", self.replies)
    }
}

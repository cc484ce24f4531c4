//! The driver that connects a guesser, a game and the renderers.

use std::{
    any::Any,
    fmt::Display,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use indicatif::ProgressBar;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::Config,
    game::{Game, Guess, SecretCursor},
    guesser::Guesser,
    render::{Action, Renderer},
    words::Dictionary,
    GuesserError, HarnessError, Result, WordleError,
};

/// A driver that plays games with a guesser and shows them to renderers.
///
/// Create one with [`new()`](Harness::new()) and configure it with the
/// builder methods, which consume the [`Harness`] and return a new one.
/// Secrets are handed out by a [`SecretCursor`] owned by the harness, so
/// consecutive games sweep the vocabulary in order.
///
/// Failures of the guesser or of a submitted word never escape as panics.
/// They are returned, and the latest one is also kept as the user-visible
/// [`error()`](Harness::error()).
///
/// # Examples
///
/// ```rust
/// use wordle_kata::{guesser::Consistent, Config, Dictionary, Harness};
///
/// let dictionary = Dictionary::builtin();
/// let config = Config {
///     num_games_to_test: 5,
///     ..Config::default()
/// };
///
/// let mut harness = Harness::new(&dictionary, config)
///     .quiet()
///     .guesser(Box::new(Consistent::new()));
///
/// let record = harness.run()?;
/// assert_eq!(record.games().len(), 5);
/// #
/// # Ok::<_, wordle_kata::WordleError>(())
/// ```
#[derive(Debug)]
pub struct Harness<'d> {
    dictionary: &'d Dictionary,
    config: Config,
    cursor: SecretCursor,
    game: Option<Game<'d>>,
    guesser: Option<Box<dyn Guesser>>,
    renderers: Vec<Box<dyn Renderer>>,
    error: Option<String>,
    verbose: bool,
    cancel: Arc<AtomicBool>,
}

impl<'d> Harness<'d> {
    /// Creates a harness with no guesser and no renderers.
    ///
    /// The first game starts at the beginning of the vocabulary.
    pub fn new(dictionary: &'d Dictionary, config: Config) -> Self {
        Harness {
            dictionary,
            config,
            cursor: SecretCursor::default(),
            game: None,
            guesser: None,
            renderers: Vec::new(),
            error: None,
            verbose: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shows a progress bar while running a batch.
    pub fn verbose(self) -> Self {
        Harness {
            verbose: true,
            ..self
        }
    }

    pub fn quiet(self) -> Self {
        Harness {
            verbose: false,
            ..self
        }
    }

    pub fn guesser(self, guesser: Box<dyn Guesser>) -> Self {
        Harness {
            guesser: Some(guesser),
            ..self
        }
    }

    pub fn renderer(self, renderer: Box<dyn Renderer>) -> Self {
        let mut renderers = self.renderers;
        renderers.push(renderer);
        Harness { renderers, ..self }
    }

    /// Makes the next game use the word at `index` as its secret.
    pub fn start_at(self, index: usize) -> Self {
        Harness {
            cursor: SecretCursor::new(index),
            ..self
        }
    }

    pub fn cursor(self, cursor: SecretCursor) -> Self {
        Harness { cursor, ..self }
    }

    /// A flag that stops [`run()`](Harness::run()) before its next game.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// The current game, if one has started.
    pub fn game(&self) -> Option<&Game<'d>> {
        self.game.as_ref()
    }

    /// The message of the latest failure, if it has not been cleared.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn show_error(&mut self, error: &WordleError) {
        self.error = Some(user_message(error));
    }

    /// Replaces the guesser and starts over with a fresh game.
    pub fn set_guesser(&mut self, guesser: Box<dyn Guesser>) -> Result<()> {
        info!("switching guesser to {}", guesser);
        self.guesser = Some(guesser);
        self.reset()
    }

    /// Clears the error and starts a fresh game with the next secret.
    pub fn reset(&mut self) -> Result<()> {
        self.clear_error();
        self.next_game()?;
        if let Some(game) = &self.game {
            notify(&mut self.renderers, Action::Reset, game);
        }
        Ok(())
    }

    fn next_game(&mut self) -> Result<()> {
        debug!("starting a game with secret #{}", self.cursor.position());
        let game = Game::from_cursor(self.dictionary, &mut self.cursor)
            .and_then(|game| game.with_max_guesses(self.config.max_guesses))
            .map_err(|e| {
                self.error = Some(e.to_string());
                e
            })?;
        self.game = Some(game);
        Ok(())
    }

    /// Asks the guesser for one word and submits it to the current game.
    ///
    /// The first call starts a game. On success the renderers are told about
    /// the new guess.
    pub fn guess(&mut self) -> Result<()> {
        self.clear_error();
        if self.game.is_none() {
            self.reset()?;
        }

        let result = self.guess_inner();
        if let Err(e) = &result {
            warn!("guess failed: {}", user_message(e));
            self.show_error(e);
        }
        result
    }

    fn guess_inner(&mut self) -> Result<()> {
        let game = match self.game.as_mut() {
            Some(game) => game,
            None => return Ok(()),
        };

        let reply = call_guesser(self.guesser.as_deref(), self.dictionary, game.history())?;
        game.submit_value(&reply)?;
        notify(&mut self.renderers, Action::Guess, game);

        Ok(())
    }

    /// Plays `num_games_to_test` games back to back.
    ///
    /// The harness resets first. Each game is played until it is over and
    /// then shown with [`Action::Submit`]. If the guesser or one of its words
    /// fails, that game is recorded with the error and the batch moves on to
    /// a fresh game. The [cancel flag](Harness::cancel_handle()) is cleared
    /// when the run starts and checked before every game.
    pub fn run(&mut self) -> Result<Record> {
        self.cancel.store(false, Ordering::SeqCst);
        self.reset()?;

        let total = self.config.num_games_to_test;
        let name = self
            .guesser
            .as_ref()
            .map_or_else(|| "none".to_string(), |g| g.to_string());
        let mut record = Record::new(name, self.config.max_guesses);

        let progress = if self.verbose {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };

        for i in 0..total {
            if self.cancel.load(Ordering::SeqCst) {
                info!("batch cancelled after {} of {} games", i, total);
                record.cancelled = true;
                break;
            }
            if i > 0 {
                self.next_game()?;
            }

            let error = match self.play_out() {
                Ok(()) => None,
                Err(e) => {
                    warn!("game {} failed: {}", i + 1, user_message(&e));
                    self.show_error(&e);
                    Some(user_message(&e))
                }
            };

            if let Some(game) = &self.game {
                if error.is_none() {
                    notify(&mut self.renderers, Action::Submit, game);
                }
                record.games.push(GameRecord::new(game, error));
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        info!(
            "played {} games, solved {}",
            record.games.len(),
            record.num_solved()
        );

        Ok(record)
    }

    fn play_out(&mut self) -> Result<()> {
        let game = match self.game.as_mut() {
            Some(game) => game,
            None => return Ok(()),
        };

        while !game.is_game_over() {
            let reply = call_guesser(self.guesser.as_deref(), self.dictionary, game.history())?;
            game.submit_value(&reply)?;
        }

        Ok(())
    }
}

fn notify(renderers: &mut [Box<dyn Renderer>], action: Action, game: &Game<'_>) {
    for renderer in renderers.iter_mut() {
        renderer.render(action, game);
    }
}

/// Calls untrusted guesser code, turning a panic into an error.
fn call_guesser(
    guesser: Option<&dyn Guesser>,
    vocabulary: &[String],
    guesses: &[Guess],
) -> Result<Value, GuesserError> {
    let guesser = guesser.ok_or(GuesserError::NotDefined)?;
    panic::catch_unwind(AssertUnwindSafe(|| {
        guesser.guess_word(vocabulary, guesses)
    }))
    .unwrap_or_else(|payload| Err(GuesserError::Panicked(panic_message(payload))))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// The message a player should see for `error`.
fn user_message(error: &WordleError) -> String {
    match error {
        WordleError::Puzzle { kind } => kind.to_string(),
        WordleError::Guesser { kind } => kind.to_string(),
        other => other.to_string(),
    }
}

/// The outcome of one game of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub secret: String,
    pub guesses: Vec<Guess>,
    pub num_guesses_to_win: usize,
    pub error: Option<String>,
}

impl GameRecord {
    fn new(game: &Game<'_>, error: Option<String>) -> Self {
        GameRecord {
            secret: game.secret().to_string(),
            guesses: game.guesses(),
            num_guesses_to_win: game.num_guesses_to_win(),
            error,
        }
    }

    pub fn solved(&self) -> bool {
        self.num_guesses_to_win > 0
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    guesser: String,
    max_guesses: usize,
    games: Vec<GameRecord>,
    cancelled: bool,
}

impl Record {
    fn new(guesser: String, max_guesses: usize) -> Self {
        Record {
            guesser,
            max_guesses,
            ..Self::default()
        }
    }

    /// The name of the guesser that played.
    pub fn guesser(&self) -> &str {
        &self.guesser
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    /// Returns true if the batch stopped early because it was cancelled.
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn num_played(&self) -> u32 {
        self.games.len() as u32
    }

    pub fn num_solved(&self) -> u32 {
        self.games.iter().filter(|g| g.solved()).count() as u32
    }

    pub fn num_missed(&self) -> u32 {
        self.num_played() - self.num_solved()
    }

    pub fn num_errors(&self) -> u32 {
        self.games.iter().filter(|g| g.error.is_some()).count() as u32
    }

    pub fn frac_solved(&self) -> f32 {
        self.num_solved() as f32 / self.num_played().max(1) as f32
    }

    /// The average number of guesses over solved games, if any were solved.
    pub fn mean_guesses(&self) -> Option<f32> {
        let solved = self.num_solved();
        (solved > 0).then(|| {
            let guesses: usize = self.games.iter().map(|g| g.num_guesses_to_win).sum();
            guesses as f32 / solved as f32
        })
    }

    /// Counts of games by [`num_guesses_to_win`](GameRecord::num_guesses_to_win),
    /// with unsolved games in bin 0.
    pub fn histogram(&self) -> Vec<u32> {
        let mut bins = vec![0; self.max_guesses + 1];
        for game in &self.games {
            if let Some(bin) = bins.get_mut(game.num_guesses_to_win) {
                *bin += 1;
            }
        }
        bins
    }

    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:-^80}", self.guesser)?;
        write!(f, "Ran {} words", self.num_played())?;
        if self.cancelled {
            write!(f, " before being cancelled")?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "Guessed {} correctly, or {:.1}%, and {} incorrectly ({} errors)",
            self.num_solved(),
            self.frac_solved() * 100.,
            self.num_missed(),
            self.num_errors()
        )?;

        match self.mean_guesses() {
            Some(mean) => writeln!(f, "Correct guesses took {:.2} attempts on average", mean),
            None => writeln!(f, "No puzzles were solved"),
        }
    }
}

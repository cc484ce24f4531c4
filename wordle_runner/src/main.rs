use std::{cell::RefCell, error::Error, path::PathBuf, process::ExitCode, rc::Rc};

use clap::{Parser, ValueEnum};
use log::error;
use wordle_guessers::Common;
use wordle_kata::{
    game::SecretCursor,
    guesser::Consistent,
    render::{BoardRenderer, DistributionRenderer},
    Config, Guesser, Harness, WasmGuesser, WordleError,
};

/// Plays a batch of Wordle games with a guesser and reports how it did.
#[derive(Parser, Debug)]
#[clap(version)]
struct Opts {
    /// JSON configuration file. Built-in defaults are used without one.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Number of games to play, overriding the configuration.
    #[clap(long)]
    games: Option<usize>,

    /// Index in the vocabulary of the first secret.
    #[clap(long, conflicts_with = "random_start")]
    start: Option<usize>,

    /// Start at a random secret instead.
    #[clap(long)]
    random_start: bool,

    /// Which built-in guesser plays.
    #[clap(long, value_enum, default_value_t = BuiltinGuesser::Common)]
    guesser: BuiltinGuesser,

    /// Opening word for the `consistent` guesser.
    #[clap(long)]
    first_word: Option<String>,

    /// A guesser compiled to WebAssembly, played instead of the built-in one.
    #[clap(long, requires = "name")]
    wasm: Option<PathBuf>,

    /// The name the wasm guesser was exported under.
    #[clap(long, requires = "wasm")]
    name: Option<String>,

    /// Print the record as JSON instead of the board and chart.
    #[clap(long)]
    json: bool,

    /// Show progress and informational logs.
    #[clap(long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum BuiltinGuesser {
    Consistent,
    Common,
}

impl Opts {
    fn make_guesser(&self) -> Result<Box<dyn Guesser>, WordleError> {
        if let (Some(path), Some(name)) = (&self.wasm, &self.name) {
            return Ok(Box::new(WasmGuesser::new_from_wasm(path, name)?));
        }

        Ok(match self.guesser {
            BuiltinGuesser::Consistent => match &self.first_word {
                Some(word) => Box::new(Consistent::new().first_word(word.as_str())),
                None => Box::new(Consistent::new()),
            },
            BuiltinGuesser::Common => Box::new(Common::new()),
        })
    }
}

fn run(opts: Opts) -> Result<(), WordleError> {
    let mut config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(games) = opts.games {
        config.num_games_to_test = games;
    }

    let dictionary = config.dictionary()?;
    let guesser = opts.make_guesser()?;
    let cursor = if opts.random_start {
        SecretCursor::random(&dictionary, &mut rand::thread_rng())
    } else {
        SecretCursor::new(opts.start.unwrap_or(0))
    };

    let board = Rc::new(RefCell::new(BoardRenderer::new(
        config.max_guesses,
        dictionary.word_len(),
    )));
    let chart = Rc::new(RefCell::new(DistributionRenderer::new(
        config.max_guesses,
        config.num_games_to_test,
    )));

    let mut harness = Harness::new(&dictionary, config)
        .cursor(cursor)
        .guesser(guesser)
        .renderer(Box::new(Rc::clone(&board)))
        .renderer(Box::new(Rc::clone(&chart)));
    if opts.verbose {
        harness = harness.verbose();
    }

    let record = harness.run()?;

    if opts.json {
        println!("{}", record.to_json()?);
    } else {
        println!("{}", board.borrow());
        println!("{}", chart.borrow());
        print!("{}", record);
    }

    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    let default_filter = if opts.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

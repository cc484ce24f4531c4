//! Displaying games: the board of guesses and the distribution of results.

use std::{
    cell::RefCell,
    fmt::{Debug, Display},
    rc::Rc,
};

use comfy_table::{Cell, Color, Row, Table};
use owo_colors::{AnsiColors, OwoColorize, Stream};

use crate::game::{Game, Guess, Mark};

/// Why a renderer is being notified.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Action {
    /// A fresh game replaced the old one.
    Reset,

    /// A single guess was just added to the game.
    Guess,

    /// A game of a batch finished.
    Submit,
}

/// Something that shows games to the player.
///
/// Renderers only ever see a shared reference to the [`Game`], so they cannot
/// change it.
pub trait Renderer: Debug {
    fn render(&mut self, action: Action, game: &Game<'_>);
}

impl<R: Renderer> Renderer for Rc<RefCell<R>> {
    fn render(&mut self, action: Action, game: &Game<'_>) {
        self.borrow_mut().render(action, game)
    }
}

/// A board with one row per allowed guess.
///
/// `Reset` blanks every row, `Guess` fills in the row of the newest guess,
/// and `Submit` redraws every row from the game's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRenderer {
    rows: Vec<Option<Guess>>,
    word_len: usize,
}

impl BoardRenderer {
    pub fn new(max_guesses: usize, word_len: usize) -> Self {
        BoardRenderer {
            rows: vec![None; max_guesses],
            word_len,
        }
    }

    pub fn rows(&self) -> &[Option<Guess>] {
        &self.rows
    }

    fn render_row(&mut self, row: usize, guess: Option<&Guess>) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = guess.cloned();
        }
    }
}

impl Renderer for BoardRenderer {
    fn render(&mut self, action: Action, game: &Game<'_>) {
        match action {
            Action::Reset => self.rows.iter_mut().for_each(|row| *row = None),
            Action::Submit => {
                for i in 0..self.rows.len() {
                    self.render_row(i, game.history().get(i));
                }
            }
            Action::Guess => {
                if let Some(last) = game.history().last() {
                    self.render_row(game.history().len() - 1, Some(last));
                }
            }
        }
    }
}

fn mark_color(mark: Mark) -> Color {
    match mark {
        Mark::Correct => Color::Green,
        Mark::Present => Color::Yellow,
        Mark::Absent => Color::DarkGrey,
    }
}

impl Display for BoardRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);

        for guess in &self.rows {
            let mut row = Row::new();
            match guess {
                None => {
                    for _ in 0..self.word_len {
                        row.add_cell(Cell::new(" "));
                    }
                }
                Some(guess) => {
                    for (letter, &mark) in guess.word.chars().zip(guess.score.marks()) {
                        row.add_cell(
                            Cell::new(letter.to_ascii_uppercase())
                                .fg(Color::Black)
                                .bg(mark_color(mark)),
                        );
                    }
                }
            }
            table.add_row(row);
        }

        write!(f, "{}", table)
    }
}

const BAR_WIDTH: usize = 50;

/// A chart of how many guesses each game of a batch took.
///
/// Bin `n` counts games won on guess `n`, and bin 0 counts games that were
/// not won. `Reset` clears the chart and `Submit` records the finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionRenderer {
    scores: Vec<u32>,
    played: u32,
    total: u32,
}

impl DistributionRenderer {
    /// Creates a chart for a batch of `total` games.
    pub fn new(max_guesses: usize, total: usize) -> Self {
        DistributionRenderer {
            scores: vec![0; max_guesses + 1],
            played: 0,
            total: total as u32,
        }
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn played(&self) -> u32 {
        self.played
    }
}

impl Renderer for DistributionRenderer {
    fn render(&mut self, action: Action, game: &Game<'_>) {
        match action {
            Action::Reset => {
                self.played = 0;
                self.scores.iter_mut().for_each(|s| *s = 0);
            }
            Action::Submit => {
                self.played += 1;
                if let Some(bin) = self.scores.get_mut(game.num_guesses_to_win()) {
                    *bin += 1;
                }
            }
            Action::Guess => {}
        }
    }
}

impl Display for DistributionRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}/{} games", self.played, self.total)?;

        let total = self.total.max(1) as f32;
        for (i, &score) in self.scores.iter().enumerate() {
            let marks = ((score as f32 / total) * BAR_WIDTH as f32).round() as usize;
            let bar = format!("{:■>marks$}", "");
            let color = if i == 0 {
                AnsiColors::Red
            } else {
                AnsiColors::Green
            };
            writeln!(
                f,
                "{} |{} ({})",
                i,
                bar.if_supports_color(Stream::Stdout, |text| text.color(color)),
                score
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Dictionary;

    #[test]
    fn board_follows_actions() {
        let dictionary = Dictionary::builtin();
        let mut game = Game::new(&dictionary, "arose").unwrap();
        let mut board = BoardRenderer::new(6, 5);

        game.submit("roast").unwrap();
        board.render(Action::Guess, &game);
        assert_eq!(board.rows()[0].as_ref().unwrap().word, "roast");
        assert!(board.rows()[1].is_none());

        game.submit("chaos").unwrap();
        game.submit("arose").unwrap();
        board.render(Action::Submit, &game);
        let words: Vec<_> = board
            .rows()
            .iter()
            .map(|row| row.as_ref().map(|g| g.word.as_str()))
            .collect();
        assert_eq!(
            words,
            [Some("roast"), Some("chaos"), Some("arose"), None, None, None]
        );

        board.render(Action::Reset, &game);
        assert!(board.rows().iter().all(Option::is_none));
    }

    #[test]
    fn board_displays_letters() {
        let dictionary = Dictionary::builtin();
        let mut game = Game::new(&dictionary, "arose").unwrap();
        let mut board = BoardRenderer::new(6, 5);
        game.submit("chaos").unwrap();
        board.render(Action::Guess, &game);

        let text = board.to_string();
        for letter in ["C", "H", "A", "O", "S"] {
            assert!(text.contains(letter));
        }
    }

    #[test]
    fn distribution_counts_games() {
        let dictionary = Dictionary::builtin();
        let mut chart = DistributionRenderer::new(6, 3);

        let mut won = Game::new(&dictionary, "arose").unwrap();
        won.submit("prose").unwrap();
        won.submit("arose").unwrap();
        chart.render(Action::Submit, &won);

        let mut lost = Game::new(&dictionary, "arose").unwrap();
        for word in ["proof", "chaos", "tests", "pests", "chest", "float"] {
            lost.submit(word).unwrap();
        }
        chart.render(Action::Guess, &lost);
        chart.render(Action::Submit, &lost);

        assert_eq!(chart.played(), 2);
        assert_eq!(chart.scores(), &[1, 0, 1, 0, 0, 0, 0]);
        assert!(chart.to_string().starts_with("2/3 games"));

        chart.render(Action::Reset, &lost);
        assert_eq!(chart.played(), 0);
        assert!(chart.scores().iter().all(|&s| s == 0));
    }
}

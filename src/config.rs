//! Deployment constants: guess limit, word length, word list and batch size.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    game::MAX_GUESSES,
    words::{Dictionary, WORD_LEN},
    ConfigError, Result,
};

/// The settings for one deployment.
///
/// Every field has a default, so a configuration file only needs the fields
/// it changes.
///
/// # Examples
///
/// ```rust
/// use wordle_kata::Config;
///
/// let config = Config::from_json_str(r#"{ "num_games_to_test": 20 }"#)?;
/// assert_eq!(config.max_guesses, 6);
/// assert_eq!(config.num_games_to_test, 20);
/// assert!(config.dictionary()?.contains("arose"));
/// #
/// # Ok::<_, wordle_kata::WordleError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_guesses: usize,
    pub word_len: usize,
    pub num_games_to_test: usize,

    /// A file with one word per line. The built-in list is used when unset.
    pub word_list: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_guesses: MAX_GUESSES,
            word_len: WORD_LEN,
            num_games_to_test: 100,
            word_list: None,
        }
    }
}

impl Config {
    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).map_err(ConfigError::from)?;
        if config.max_guesses == 0 {
            return Err(ConfigError::NoGuesses.into());
        }
        Ok(config)
    }

    /// Builds the vocabulary this configuration describes.
    pub fn dictionary(&self) -> Result<Dictionary> {
        match &self.word_list {
            None if self.word_len == WORD_LEN => Ok(Dictionary::builtin()),
            None => Ok(Dictionary::new(
                crate::words::WORDS.iter().copied(),
                self.word_len,
            )?),
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Ok(parse_word_list(&text, self.word_len)?)
            }
        }
    }
}

fn parse_word_list(text: &str, word_len: usize) -> Result<Dictionary, crate::DictionaryError> {
    Dictionary::new(
        text.lines().map(str::trim).filter(|line| !line.is_empty()),
        word_len,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{DictionaryError, WordleError};

    #[test]
    fn defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_guesses, 6);
        assert_eq!(config.word_len, 5);
        assert_eq!(config.dictionary().unwrap(), Dictionary::builtin());
    }

    #[test]
    fn rejects_zero_guesses() {
        assert!(matches!(
            Config::from_json_str(r#"{ "max_guesses": 0 }"#),
            Err(WordleError::Config {
                kind: ConfigError::NoGuesses
            })
        ));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(
            Config::from_json_str(r#"{ "max_guesses": "six" }"#),
            Err(WordleError::Config {
                kind: ConfigError::Serde(_)
            })
        ));
    }

    #[test]
    fn missing_word_list() {
        let config = Config {
            word_list: Some(PathBuf::from("/nonexistent/words.txt")),
            ..Config::default()
        };
        assert!(matches!(
            config.dictionary(),
            Err(WordleError::Config {
                kind: ConfigError::Io { .. }
            })
        ));
    }

    #[test]
    fn builtin_list_at_other_length() {
        let config = Config {
            word_len: 4,
            ..Config::default()
        };
        assert!(matches!(
            config.dictionary(),
            Err(WordleError::Dictionary {
                kind: DictionaryError::WrongLength { .. }
            })
        ));
    }

    /// Writes `contents` to a file unique to this test process.
    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "wordle_kata_{}_{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_word_list_file() {
        let words = scratch_file("words.txt", "cat\n\ndog\n cot \ncat\n");
        let config_path = scratch_file(
            "config.json",
            &format!(
                r#"{{ "word_len": 3, "max_guesses": 4, "word_list": {} }}"#,
                serde_json::to_string(&words).unwrap()
            ),
        );

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.max_guesses, 4);
        assert_eq!(config.word_list.as_deref(), Some(words.as_path()));

        let dictionary = config.dictionary().unwrap();
        assert_eq!(dictionary.words(), &["cat", "dog", "cot"]);
        assert_eq!(dictionary.word_len(), 3);

        fs::remove_file(words).unwrap();
        fs::remove_file(config_path).unwrap();
    }

    #[test]
    fn missing_config_file() {
        assert!(matches!(
            Config::load("/nonexistent/config.json"),
            Err(WordleError::Config {
                kind: ConfigError::Io { .. }
            })
        ));
    }

    #[test]
    fn word_list_parsing() {
        let dictionary = parse_word_list("arose\n\n  chaos \nproof\n", 5).unwrap();
        assert_eq!(dictionary.words(), &["arose", "chaos", "proof"]);
        assert!(parse_word_list("arose\nabc\n", 5).is_err());
    }
}

use crate::error::{Result, TyperankError};
use crate::result::TestMode;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Words generated per configured second in time mode; far above any human pace.
const WORDS_PER_SECOND: usize = 4;

#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct QuoteList {
    pub name: String,
    pub size: u32,
    pub quotes: Vec<String>,
}

fn read_embedded<T: for<'de> Deserialize<'de>>(file_name: &str) -> Result<T> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| TyperankError::TextSource(format!("{file_name} not embedded")))?;
    let contents = file
        .contents_utf8()
        .ok_or_else(|| TyperankError::TextSource(format!("{file_name} is not utf-8")))?;
    Ok(serde_json::from_str(contents)?)
}

impl WordList {
    pub fn english() -> Result<Self> {
        read_embedded("english.json")
    }

    /// `count` words drawn with replacement, so any count is possible.
    pub fn random_words(&self, count: usize) -> Vec<&str> {
        let mut rng = rand::thread_rng();
        (0..count)
            .filter_map(|_| self.words.choose(&mut rng).map(String::as_str))
            .collect()
    }
}

impl QuoteList {
    pub fn builtin() -> Result<Self> {
        read_embedded("quotes.json")
    }

    pub fn random_quote(&self) -> Option<&str> {
        self.quotes.choose(&mut rand::thread_rng()).map(String::as_str)
    }
}

/// How a target text is built for the next test.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenConfig {
    pub mode: TestMode,
    pub duration_secs: u32,
    pub word_count: usize,
    pub custom_prompt: Option<String>,
}

pub struct TextGenerator {
    config: TextGenConfig,
    words: WordList,
    quotes: QuoteList,
}

impl TextGenerator {
    pub fn new(config: TextGenConfig) -> Result<Self> {
        Ok(Self {
            config,
            words: WordList::english()?,
            quotes: QuoteList::builtin()?,
        })
    }

    pub fn config(&self) -> &TextGenConfig {
        &self.config
    }

    /// Target text for a fresh test. A non-blank custom prompt always wins.
    pub fn generate(&self) -> String {
        if let Some(prompt) = self
            .config
            .custom_prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            return prompt.to_string();
        }

        match self.config.mode {
            TestMode::Words => self.words.random_words(self.config.word_count.max(1)).join(" "),
            TestMode::Time => {
                let count = (self.config.duration_secs as usize * WORDS_PER_SECOND).max(1);
                self.words.random_words(count).join(" ")
            }
            TestMode::Quote => match self.quotes.random_quote() {
                Some(quote) => quote.to_string(),
                None => self.words.random_words(self.config.word_count.max(1)).join(" "),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: TestMode) -> TextGenConfig {
        TextGenConfig {
            mode,
            duration_secs: 30,
            word_count: 10,
            custom_prompt: None,
        }
    }

    #[test]
    fn test_embedded_lists_load() {
        let words = WordList::english().unwrap();
        assert_eq!(words.name, "english");
        assert_eq!(words.size as usize, words.words.len());

        let quotes = QuoteList::builtin().unwrap();
        assert!(quotes.quotes.len() >= 4);
        assert!(quotes
            .quotes
            .iter()
            .any(|q| q.starts_with("The quick brown fox")));
    }

    #[test]
    fn test_words_mode_word_count() {
        let gen = TextGenerator::new(config(TestMode::Words)).unwrap();
        let text = gen.generate();
        assert_eq!(text.split(' ').count(), 10);
    }

    #[test]
    fn test_time_mode_scales_with_duration() {
        let gen = TextGenerator::new(config(TestMode::Time)).unwrap();
        assert_eq!(gen.generate().split(' ').count(), 30 * WORDS_PER_SECOND);
    }

    #[test]
    fn test_quote_mode_picks_builtin_quote() {
        let gen = TextGenerator::new(config(TestMode::Quote)).unwrap();
        let quotes = QuoteList::builtin().unwrap();
        let text = gen.generate();
        assert!(quotes.quotes.contains(&text));
    }

    #[test]
    fn test_custom_prompt_overrides() {
        let mut cfg = config(TestMode::Quote);
        cfg.custom_prompt = Some("  hello there ".to_string());
        let gen = TextGenerator::new(cfg).unwrap();
        assert_eq!(gen.generate(), "hello there");
    }

    #[test]
    fn test_blank_custom_prompt_is_ignored() {
        let mut cfg = config(TestMode::Words);
        cfg.custom_prompt = Some("   ".to_string());
        let gen = TextGenerator::new(cfg).unwrap();
        assert_eq!(gen.generate().split(' ').count(), 10);
    }
}

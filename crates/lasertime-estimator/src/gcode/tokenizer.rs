//! Tokenizer for normalized program lines
//!
//! A token is a letter followed by one or more of digits, `.`, `+` or `-`
//! (`G1`, `M07`, `X-12.5`). The first token on a line is its command; the
//! rest are parameters.

use lasertime_core::GcodeError;
use regex::Regex;
use std::sync::OnceLock;

/// A single `letter + number` word, uppercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Full token text, e.g. `X12.5`
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Leading address letter
    pub fn letter(&self) -> char {
        self.text.chars().next().unwrap_or_default()
    }

    /// Text after the address letter
    pub fn operand(&self) -> &str {
        let start = self.letter().len_utf8();
        &self.text[start..]
    }

    /// Parse the operand as a real number
    pub fn value(&self, line_number: usize) -> Result<f64, GcodeError> {
        self.operand()
            .parse::<f64>()
            .map_err(|e| GcodeError::MalformedOperand {
                line_number,
                token: self.text.clone(),
                reason: e.to_string(),
            })
    }
}

/// Tokens extracted from one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    /// First token on the line
    pub command: Token,
    /// Remaining tokens in source order
    pub params: Vec<Token>,
}

impl TokenizedLine {
    /// Parameter tokens with the given address letter, in source order
    pub fn params_for(&self, letter: char) -> impl Iterator<Item = &Token> + '_ {
        self.params.iter().filter(move |t| t.letter() == letter)
    }

    /// Value of the last parameter with the given letter, if any
    pub fn last_value(&self, letter: char, line_number: usize) -> Result<Option<f64>, GcodeError> {
        let mut found = None;
        for token in self.params_for(letter) {
            found = Some(token.value(line_number)?);
        }
        Ok(found)
    }
}

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| Regex::new(r"[A-Z][+\-0-9.]+").expect("invalid regex pattern"))
}

/// Split a normalized line into tokens. Returns `None` for inert lines.
pub fn tokenize(line: &str) -> Option<TokenizedLine> {
    let upper = line.to_uppercase();
    let mut tokens = token_regex()
        .find_iter(&upper)
        .map(|m| Token::new(m.as_str()));

    let command = tokens.next()?;
    Some(TokenizedLine {
        command,
        params: tokens.collect(),
    })
}

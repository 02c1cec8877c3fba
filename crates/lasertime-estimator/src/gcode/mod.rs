//! G-Code line handling
//!
//! This module provides:
//! - Comment stripping (line and parenthetical comments)
//! - Tokenization into a command token and parameter tokens
//! - Command classification against the controller's configured tokens

pub mod command;
pub mod normalizer;
pub mod tokenizer;

pub use command::*;
pub use normalizer::*;
pub use tokenizer::*;

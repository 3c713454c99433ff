//! Asking the user things.
//!
//! The session never talks to a terminal directly; it goes through a
//! [`Prompter`]. [`ScriptedPrompter`] answers from a queue, for tests and
//! non-interactive runs.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::{Error, Result};

/// What a run of the tool does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Validate a workbook and write scripts for its valid sheets.
    Scripts,
    /// Build a new template sheet from catalog metadata.
    Template,
    /// Validate a workbook and report, writing nothing.
    Validate,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Scripts, Mode::Template, Mode::Validate];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Scripts => "Scripts",
            Mode::Template => "Template",
            Mode::Validate => "Validation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a two-way question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoWay {
    First,
    Second,
}

/// Interactive questions. Every method may fail with [`Error::Aborted`]
/// when the user cancels.
pub trait Prompter {
    fn choose_mode(&mut self) -> Result<Mode>;

    fn choose_two_way(&mut self, prompt: &str, first: &str, second: &str) -> Result<TwoWay>;

    /// Show a message and wait for acknowledgement.
    fn confirm(&mut self, message: &str) -> Result<()>;

    fn choose_from_list(&mut self, prompt: &str, items: &[String]) -> Result<String>;

    fn enter_text(&mut self, prompt: &str, label: &str) -> Result<String>;
}

/// A canned answer for [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Mode(Mode),
    First,
    Second,
    /// Pick this item from a list.
    Pick(String),
    Text(String),
}

/// Answers questions from a queue and records every message shown.
///
/// Running out of answers, or meeting an answer of the wrong shape, aborts.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    shown: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            shown: Vec::new(),
        }
    }

    /// Messages passed to [`Prompter::confirm`], in order.
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        let answer = self.answers.pop_front().ok_or(Error::Aborted)?;
        debug!(prompt, ?answer, "scripted answer");
        Ok(answer)
    }
}

impl Prompter for ScriptedPrompter {
    fn choose_mode(&mut self) -> Result<Mode> {
        match self.next("mode")? {
            Answer::Mode(mode) => Ok(mode),
            _ => Err(Error::Aborted),
        }
    }

    fn choose_two_way(&mut self, prompt: &str, _first: &str, _second: &str) -> Result<TwoWay> {
        match self.next(prompt)? {
            Answer::First => Ok(TwoWay::First),
            Answer::Second => Ok(TwoWay::Second),
            _ => Err(Error::Aborted),
        }
    }

    fn confirm(&mut self, message: &str) -> Result<()> {
        self.shown.push(message.to_string());
        Ok(())
    }

    fn choose_from_list(&mut self, prompt: &str, items: &[String]) -> Result<String> {
        match self.next(prompt)? {
            Answer::Pick(item) if items.contains(&item) => Ok(item),
            _ => Err(Error::Aborted),
        }
    }

    fn enter_text(&mut self, prompt: &str, _label: &str) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(text) => Ok(text),
            _ => Err(Error::Aborted),
        }
    }
}

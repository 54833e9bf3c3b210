//! Interactive prompt handling.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::cmdutil::CancelError;

/// Interactive terminal prompts.
pub trait Prompter: Send + Sync + std::fmt::Debug {
    /// Prompt for a line of text. An empty answer is allowed.
    fn input(&self, prompt: &str) -> Result<String>;
}

/// Prompter backed by `dialoguer`.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str) -> Result<String> {
        let answer: Result<String, _> = dialoguer::Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        match answer {
            Ok(answer) => Ok(answer),
            Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => {
                Err(CancelError.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Prompter returning canned answers, then empty strings (or a
/// [`CancelError`] after [`StubPrompter::cancel_when_exhausted`]).
#[derive(Debug, Default)]
pub struct StubPrompter {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    cancel_when_exhausted: AtomicBool,
}

impl StubPrompter {
    /// Create a stub that answers with `answers` in order.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            cancel_when_exhausted: AtomicBool::new(false),
        }
    }

    /// Behave like an interrupted prompt once the answers run out.
    pub fn cancel_when_exhausted(&self) {
        self.cancel_when_exhausted.store(true, Ordering::Relaxed);
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Prompter for StubPrompter {
    fn input(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(prompt.to_string());
        let mut answers = self
            .answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match answers.pop_front() {
            Some(answer) => Ok(answer),
            None if self.cancel_when_exhausted.load(Ordering::Relaxed) => Err(CancelError.into()),
            None => Ok(String::new()),
        }
    }
}

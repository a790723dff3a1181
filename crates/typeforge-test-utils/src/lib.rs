//! Scripted collaborator fakes
//!
//! Deterministic stand-ins for the language model and the type checker.
//! Each fake consumes a fixed script and records everything it was asked,
//! so tests can assert both the outcome and the exact calls the loop made.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use typeforge_annotate::{
    CheckCommand, CheckReport, CheckerError, LanguageModel, ModelError, TypeChecker,
};

/// A model that replays queued answers
///
/// Answers are consumed in order; running past the script is a test bug and
/// panics. Every prompt is recorded for later assertion.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// A model with the given answers queued
    #[must_use]
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of calls made
    #[must_use]
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn respond(
        &self,
        _instructions: &str,
        _history: &[(String, String)],
        prompt: &str,
    ) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.answers.lock().unwrap().pop_front() {
            Some(answer) => Ok(answer),
            None => panic!("scripted model ran out of answers"),
        }
    }
}

/// One scripted checker verdict
#[derive(Debug, Clone)]
pub enum CheckScript {
    /// The checker runs and passes
    Pass,
    /// The checker runs and reports this output
    Fail(String),
    /// The checker cannot be invoked at all
    Unavailable,
}

impl CheckScript {
    /// A failing verdict with canned output
    #[must_use]
    pub fn fail(output: &str) -> Self {
        Self::Fail(output.to_string())
    }
}

/// A checker that replays scripted verdicts
///
/// Verdicts are consumed in order; running past the script panics. Every
/// command is recorded so tests can assert baseline and shadow invocations.
#[derive(Debug, Default)]
pub struct ScriptedChecker {
    script: Mutex<VecDeque<CheckScript>>,
    commands: Mutex<Vec<CheckCommand>>,
}

impl ScriptedChecker {
    /// A checker with the given verdicts queued
    #[must_use]
    pub fn new(script: &[CheckScript]) -> Self {
        Self {
            script: Mutex::new(script.iter().cloned().collect()),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// A checker that passes every invocation
    #[must_use]
    pub fn always_pass() -> Self {
        Self::new(&[]) // empty script falls through to Pass
    }

    /// Commands received so far, in call order
    #[must_use]
    pub fn commands(&self) -> Vec<CheckCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Number of invocations made
    #[must_use]
    pub fn calls(&self) -> usize {
        self.commands.lock().unwrap().len()
    }
}

#[async_trait]
impl TypeChecker for ScriptedChecker {
    async fn run(&self, command: &CheckCommand) -> Result<CheckReport, CheckerError> {
        self.commands.lock().unwrap().push(command.clone());
        let verdict = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(CheckScript::Pass);
        match verdict {
            CheckScript::Pass => Ok(CheckReport {
                success: true,
                output: String::new(),
            }),
            CheckScript::Fail(output) => Ok(CheckReport {
                success: false,
                output,
            }),
            CheckScript::Unavailable => Err(CheckerError::Invocation {
                command: command.rendered(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted as unavailable"),
            }),
        }
    }
}

//! Per-turn move query

use crate::error::{Error, Result};
use crate::prompt::{Observation, PromptTemplate};
use duelbench_llm::Message;
use regex::Regex;

/// Appended to the user message when the first answers did not parse
pub const RETRY_REMINDER: &str =
    "\n\nReminder: Answer ONLY in the required format. Provide exactly one legal action wrapped with <>.";

/// Everything needed to ask for one move
///
/// Created per turn and consumed once by the resolver.
#[derive(Debug, Clone)]
pub struct MoveQuery {
    /// Observation the prompts were built from
    pub observation: Observation,
    /// System prompt
    pub system_prompt: String,
    /// Observation text followed by the step instruction
    pub observation_prompt: String,
    /// Move pattern
    pub pattern: Regex,
    /// Generations requested by the primary query
    pub num_samples: u32,
}

impl MoveQuery {
    /// Build a query from already-rendered prompts
    ///
    /// `observation_prompt` and `step_prompt` are joined with a newline.
    ///
    /// # Errors
    /// `InvalidPattern` if `pattern` does not compile, `InvalidTurn` if
    /// `num_samples` is zero
    pub fn new(
        observation: Observation,
        system_prompt: impl Into<String>,
        observation_prompt: &str,
        step_prompt: &str,
        pattern: &str,
        num_samples: u32,
    ) -> Result<Self> {
        if num_samples == 0 {
            return Err(Error::InvalidTurn(
                "num_samples must be at least 1".to_string(),
            ));
        }
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            observation,
            system_prompt: system_prompt.into(),
            observation_prompt: format!("{observation_prompt}\n{step_prompt}"),
            pattern,
            num_samples,
        })
    }

    /// Build a query from a prompt template
    ///
    /// # Errors
    /// Same as [`MoveQuery::new`]
    pub fn assemble(
        template: &dyn PromptTemplate,
        observation: Observation,
        num_samples: u32,
    ) -> Result<Self> {
        let system_prompt = template.system_prompt(&observation.env_name);
        let observation_prompt = template.observation_prompt(&observation);
        let instruction = template.step_instruction(&observation);

        Self::new(
            observation,
            system_prompt,
            &observation_prompt,
            &instruction.prompt,
            &instruction.regex,
            num_samples,
        )
    }

    /// Primary conversation: system prompt, then the observation prompt
    #[must_use]
    pub fn conversation(&self) -> Vec<Message> {
        vec![
            Message::system(&self.system_prompt),
            Message::user(&self.observation_prompt),
        ]
    }

    /// Retry conversation: the primary one with the format reminder appended
    #[must_use]
    pub fn retry_conversation(&self) -> Vec<Message> {
        vec![
            Message::system(&self.system_prompt),
            Message::user(format!("{}{RETRY_REMINDER}", self.observation_prompt)),
        ]
    }

    /// Legal moves of the observed position
    #[must_use]
    pub fn legal_moves(&self) -> &[String] {
        &self.observation.legal_moves
    }
}

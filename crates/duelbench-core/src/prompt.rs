//! Prompt-template seam
//!
//! Prompt text itself is owned by the game environments. The resolver only
//! needs a system prompt, an observation prompt and a step instruction that
//! carries the move pattern.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One player's view of the game at a turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Environment name (e.g. `tictactoe`)
    pub env_name: String,
    /// Legal moves in `<C1R1>` form
    #[serde(default)]
    pub legal_moves: Vec<String>,
    /// Environment-specific state
    #[serde(default, flatten)]
    pub state: Map<String, Value>,
}

impl Observation {
    /// Observation with no extra state
    #[must_use]
    pub fn new(env_name: impl Into<String>, legal_moves: Vec<String>) -> Self {
        Self {
            env_name: env_name.into(),
            legal_moves,
            state: Map::new(),
        }
    }

    /// Attach a state field
    #[must_use]
    pub fn with_state(mut self, key: impl Into<String>, value: Value) -> Self {
        self.state.insert(key.into(), value);
        self
    }

    /// First legal move with `<`/`>` delimiters stripped
    #[must_use]
    pub fn first_legal_move(&self) -> Option<&str> {
        self.legal_moves.first().map(|m| strip_delimiters(m))
    }
}

/// Step prompt plus the pattern its answer must match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInstruction {
    /// Instruction appended to the observation prompt
    pub prompt: String,
    /// Move pattern; group 1 (or the whole match) is the move
    pub regex: String,
}

/// Source of prompt text for a turn
#[cfg_attr(test, mockall::automock)]
pub trait PromptTemplate: Send + Sync {
    /// System prompt for the environment
    fn system_prompt(&self, env_name: &str) -> String;

    /// Observation rendered as text
    fn observation_prompt(&self, observation: &Observation) -> String;

    /// What to answer and how the answer is parsed
    fn step_instruction(&self, observation: &Observation) -> StepInstruction;
}

/// Trim leading `<` and trailing `>` characters
#[must_use]
pub fn strip_delimiters(text: &str) -> &str {
    text.trim_matches(|c| c == '<' || c == '>')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_delimiters() {
        assert_eq!(strip_delimiters("<C1R1>"), "C1R1");
        assert_eq!(strip_delimiters("<<C2R2>>"), "C2R2");
        assert_eq!(strip_delimiters("C3R3"), "C3R3");
        assert_eq!(strip_delimiters("<>"), "");
    }

    #[test]
    fn test_first_legal_move() {
        let observation = Observation::new("tictactoe", vec!["<C1R1>".into(), "<C2R2>".into()]);
        assert_eq!(observation.first_legal_move(), Some("C1R1"));
        assert_eq!(Observation::new("tictactoe", vec![]).first_legal_move(), None);
    }

    #[test]
    fn test_observation_keeps_extra_state() {
        let observation: Observation = serde_json::from_value(json!({
            "env_name": "connect4",
            "legal_moves": ["<C1>", "<C4>"],
            "board": "......",
            "player": 1
        }))
        .unwrap();

        assert_eq!(observation.env_name, "connect4");
        assert_eq!(observation.legal_moves.len(), 2);
        assert_eq!(observation.state["board"], json!("......"));
        assert_eq!(observation.state["player"], json!(1));
    }

    #[test]
    fn test_observation_without_legal_moves() {
        let observation: Observation =
            serde_json::from_value(json!({"env_name": "nim"})).unwrap();
        assert!(observation.legal_moves.is_empty());
        assert!(observation.state.is_empty());
    }
}

//! Continuation gate
//!
//! After any failed step the operator decides whether the run goes on. There
//! is no retry: anything short of an explicit yes aborts.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin};
use tracing::{debug, warn};

/// Prompt shown after a failed step
pub const CONTINUE_PROMPT: &str = "Continue anyway? [y/N] ";

/// Operator's answer to the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Abort,
}

/// Source of operator answers
#[async_trait]
pub trait Operator: Send + Sync {
    /// Show `prompt` and read one line; `None` on end of input
    async fn ask(&self, prompt: &str) -> Option<String>;
}

/// Affirmative iff the answer starts with `y`, ignoring case and surrounding
/// whitespace.
pub fn is_affirmative(answer: Option<&str>) -> bool {
    answer
        .map(|a| a.trim().to_lowercase())
        .is_some_and(|a| a.starts_with('y'))
}

/// Ask a yes/no question; defaults to no
pub async fn confirm(operator: &dyn Operator, prompt: &str) -> bool {
    let answer = operator.ask(prompt).await;
    debug!("Operator answered {:?} to {:?}", answer, prompt);
    is_affirmative(answer.as_deref())
}

/// Ask whether the run should go on after a failure
pub async fn ask_continue(operator: &dyn Operator) -> Decision {
    if confirm(operator, CONTINUE_PROMPT).await {
        Decision::Continue
    } else {
        Decision::Abort
    }
}

/// Write and flush a prompt; `false` if the operator may not have seen it
pub async fn show_prompt<W: AsyncWrite + Unpin>(out: &mut W, prompt: &str) -> bool {
    if let Err(e) = out.write_all(prompt.as_bytes()).await {
        warn!("Could not write prompt: {}", e);
        return false;
    }
    if let Err(e) = out.flush().await {
        warn!("Could not flush prompt: {}", e);
        return false;
    }
    true
}

/// Reads answers from standard input
pub struct TerminalOperator {
    input: tokio::sync::Mutex<BufReader<Stdin>>,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self {
            input: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Operator for TerminalOperator {
    async fn ask(&self, prompt: &str) -> Option<String> {
        show_prompt(&mut tokio::io::stdout(), prompt).await;

        let mut line = String::new();
        let mut input = self.input.lock().await;
        match input.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                warn!("Could not read operator input: {}", e);
                None
            }
        }
    }
}

/// Answers prompts from a fixed script; end of input once exhausted
#[derive(Default)]
pub struct ScriptedOperator {
    answers: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    /// Operator that hits end of input on the first prompt
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the given answers in order
    pub fn answering(answers: &[&str]) -> Self {
        let operator = Self::new();
        if let Ok(mut queue) = operator.answers.lock() {
            queue.extend(answers.iter().map(|a| Some(a.to_string())));
        }
        operator
    }

    /// Every prompt shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Operator for ScriptedOperator {
    async fn ask(&self, prompt: &str) -> Option<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers_continue() {
        for answer in ["y", "Y", "yes", "YES", " y\n", "yep"] {
            let operator = ScriptedOperator::answering(&[answer]);
            let decision = tokio_test::block_on(ask_continue(&operator));
            assert_eq!(decision, Decision::Continue, "answer {:?}", answer);
        }
    }

    #[test]
    fn test_other_answers_abort() {
        for answer in ["", "\n", "n", "no", "maybe", "sure"] {
            let operator = ScriptedOperator::answering(&[answer]);
            let decision = tokio_test::block_on(ask_continue(&operator));
            assert_eq!(decision, Decision::Abort, "answer {:?}", answer);
        }
    }

    #[test]
    fn test_end_of_input_aborts() {
        let operator = ScriptedOperator::new();
        assert_eq!(
            tokio_test::block_on(ask_continue(&operator)),
            Decision::Abort
        );
        assert_eq!(operator.prompts(), vec![CONTINUE_PROMPT]);
    }

    #[test]
    fn test_show_prompt_writes_and_flushes() {
        let mut out = tokio_test::io::Builder::new()
            .write(CONTINUE_PROMPT.as_bytes())
            .build();
        assert!(tokio_test::block_on(show_prompt(&mut out, CONTINUE_PROMPT)));
    }

    #[test]
    fn test_show_prompt_reports_write_failure() {
        let mut out = tokio_test::io::Builder::new()
            .write_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            .build();
        assert!(!tokio_test::block_on(show_prompt(&mut out, CONTINUE_PROMPT)));
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative(Some("yes")));
        assert!(!is_affirmative(Some("")));
        assert!(!is_affirmative(None));
    }
}

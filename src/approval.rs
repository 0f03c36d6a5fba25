//! The consent checkpoint between record-building and writes. The prompt is
//! a small injected capability so orchestrators stay testable without a
//! terminal attached.

use std::io::{BufRead, Write};

use crossterm::tty::IsTty;

use crate::error::Result;

pub trait Confirm {
    /// Whether a human can actually answer a prompt in this context.
    fn is_interactive(&self) -> bool;
    /// Ask a yes/no question. Only a `y` (any case) means yes.
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Line-oriented stdin/stdout prompt for real runs.
pub struct ConsolePrompt;

impl Confirm for ConsolePrompt {
    fn is_interactive(&self) -> bool {
        std::io::stdin().is_tty()
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        print!("{message} [y/N] ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(is_affirmative(&line))
    }
}

fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Granted,
    /// No TTY and no auto-approve flag: the write phase is skipped.
    DeniedNonInteractive,
    /// The operator answered anything but `y`.
    DeniedByUser,
}

/// Apply the consent rules in order: an auto-approve flag grants without
/// prompting; a non-interactive context without it denies; otherwise one
/// yes/no question decides. Denial is a deliberate skip, never an error.
pub fn request_consent(
    prompt: &mut dyn Confirm,
    auto_approve: bool,
    message: &str,
) -> Result<Consent> {
    if auto_approve {
        return Ok(Consent::Granted);
    }
    if !prompt.is_interactive() {
        return Ok(Consent::DeniedNonInteractive);
    }
    if prompt.confirm(message)? {
        Ok(Consent::Granted)
    } else {
        Ok(Consent::DeniedByUser)
    }
}

/// Scripted stand-in so gate behavior can be exercised without a terminal.
#[cfg(test)]
pub struct ScriptedPrompt {
    pub interactive: bool,
    pub answers: Vec<bool>,
    pub asked: usize,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(interactive: bool, answers: Vec<bool>) -> Self {
        Self {
            interactive,
            answers,
            asked: 0,
        }
    }
}

#[cfg(test)]
impl Confirm for ScriptedPrompt {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn confirm(&mut self, _message: &str) -> Result<bool> {
        let answer = self.answers.get(self.asked).copied().unwrap_or(false);
        self.asked += 1;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y"));
        assert!(is_affirmative("  y \n"));
        assert!(!is_affirmative("yes"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("maybe"));
    }

    #[test]
    fn test_auto_approve_skips_the_prompt() {
        let mut prompt = ScriptedPrompt::new(false, vec![]);
        let consent = request_consent(&mut prompt, true, "Commit?").unwrap();
        assert_eq!(consent, Consent::Granted);
        assert_eq!(prompt.asked, 0);
    }

    #[test]
    fn test_non_interactive_without_auto_approve_is_denied() {
        let mut prompt = ScriptedPrompt::new(false, vec![true]);
        let consent = request_consent(&mut prompt, false, "Commit?").unwrap();
        assert_eq!(consent, Consent::DeniedNonInteractive);
        assert_eq!(prompt.asked, 0); // never even asked
    }

    #[test]
    fn test_interactive_answers_decide() {
        let mut yes = ScriptedPrompt::new(true, vec![true]);
        assert_eq!(request_consent(&mut yes, false, "Commit?").unwrap(), Consent::Granted);

        let mut no = ScriptedPrompt::new(true, vec![false]);
        assert_eq!(request_consent(&mut no, false, "Commit?").unwrap(), Consent::DeniedByUser);
    }
}

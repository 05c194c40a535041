use std::future::Future;

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> impl Future<Output = bool> + Send;
}

/// Approves everything; backs `--yes` on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Fixed answer, for callers that already asked.
#[derive(Debug, Clone, Copy)]
pub struct Answered(pub bool);

impl Confirm for Answered {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// `y`/`yes` in any case; anything else, including a blank line, is a no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

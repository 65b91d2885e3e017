//! Local dialogue control: interactive and batch turn loops

use super::session::{ConversationSession, Turn};
use crate::config::ConversationSettings;
use crate::error::ProviderError;
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

const FOLLOW_UP_PROMPT: &str = "Enter your follow-up question: ";

/// Input that ends a dialogue locally without reaching the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitSentinel {
    word: String,
    case_sensitive: bool,
}

impl ExitSentinel {
    pub fn new(word: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            word: word.into(),
            case_sensitive,
        }
    }

    pub fn from_settings(settings: &ConversationSettings) -> Self {
        Self::new(settings.exit_word.clone(), settings.exit_case_sensitive)
    }

    /// Whether `input`, ignoring surrounding whitespace, is the exit word
    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim();
        if self.case_sensitive {
            input == self.word
        } else {
            input.eq_ignore_ascii_case(&self.word)
        }
    }
}

impl Default for ExitSentinel {
    fn default() -> Self {
        Self::new("exit", false)
    }
}

/// Drives turns on one session until the sentinel or end of input
pub struct Dialogue<'a> {
    session: &'a mut ConversationSession,
    sentinel: ExitSentinel,
}

impl<'a> Dialogue<'a> {
    pub fn new(session: &'a mut ConversationSession, sentinel: ExitSentinel) -> Self {
        Self { session, sentinel }
    }

    async fn ensure_active(&mut self) -> Result<(), ProviderError> {
        if !self.session.is_active() {
            self.session.create().await?;
        }
        Ok(())
    }

    /// Interactive loop: answer `initial`, then keep reading follow-up
    /// questions from `input`. Returns the number of turns sent.
    pub async fn run<R, W>(&mut self, initial: &str, mut input: R, mut output: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut query = initial.to_string();
        let mut turns = 0;

        loop {
            if self.sentinel.matches(&query) {
                info!("Dialogue ended by user after {} turns", turns);
                break;
            }

            if !query.trim().is_empty() {
                self.ensure_active().await?;
                let turn = self.session.converse(query.trim()).await?;
                turns += 1;
                output.write_all(turn.render().as_bytes()).await?;
            }

            output.write_all(FOLLOW_UP_PROMPT.as_bytes()).await?;
            output.flush().await?;

            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                info!("Input closed after {} turns", turns);
                break;
            }
            query = line;
        }

        Ok(turns)
    }

    /// Send `queries` as successive turns of one dialogue, stopping at the sentinel
    pub async fn run_batch(&mut self, queries: &[String]) -> Result<Vec<Turn>, ProviderError> {
        let mut turns = Vec::with_capacity(queries.len());
        for query in queries {
            if self.sentinel.matches(query) {
                break;
            }
            self.ensure_active().await?;
            turns.push(self.session.converse(query).await?);
        }
        Ok(turns)
    }
}

//! One-turn conversation orchestration.

use crate::client::ChatApi;
use crate::config::Config;
use crate::format::format_reply;
use crate::history::ConversationHistory;
use crate::presenter::{Presenter, Role};

const FALLBACK_ERROR: &str = "Unknown error occurred";

/// How a submitted turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Trimmed input was empty; nothing changed.
    Ignored,
    /// The endpoint replied and the reply was recorded.
    Replied,
    /// The turn surfaced an error; the user message stands alone in history.
    Failed,
}

/// Drives one request/response turn at a time, owning the conversation
/// history and signalling input/typing state through the presenter.
pub struct ChatController<A: ChatApi, P: Presenter> {
    api: A,
    presenter: P,
    history: ConversationHistory,
    user_label: String,
    assistant_label: String,
}

impl<A: ChatApi, P: Presenter> ChatController<A, P> {
    pub fn new(api: A, presenter: P, config: &Config) -> Self {
        Self {
            api,
            presenter,
            history: ConversationHistory::new(),
            user_label: config.ui.user_label.clone(),
            assistant_label: config.ui.assistant_label.clone(),
        }
    }

    /// Conversation so far, raw and unformatted.
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Mutable access to the presenter, for prompt handling outside a turn.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Run one full turn: append the user message, call the endpoint, and
    /// record or surface the result. Input is re-enabled exactly once on
    /// every path that started a turn.
    pub async fn submit_turn(&mut self, user_text: &str) -> TurnOutcome {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return TurnOutcome::Ignored;
        }

        self.presenter.disable_input();
        self.presenter
            .append_to_transcript(&self.user_label, user_text, Role::User);

        // Optimistic append, not rolled back on failure: the next attempt
        // then sends the same context the failed call already saw.
        self.history.push(user_text.to_string());

        self.presenter.show_typing_indicator();
        let result = self.api.send_message(user_text, self.history.messages()).await;
        self.presenter.hide_typing_indicator();

        let outcome = match result {
            Ok(response) => match response.reply {
                Some(reply) => {
                    tracing::debug!(reply_len = reply.len(), "turn completed");
                    let fragment = format_reply(&reply);
                    self.presenter
                        .append_to_transcript(&self.assistant_label, &fragment, Role::Assistant);
                    self.history.push(reply);
                    TurnOutcome::Replied
                }
                None => {
                    // Well-formed but reply-less: display only, never stored.
                    let message = response.error.unwrap_or_else(|| FALLBACK_ERROR.to_string());
                    tracing::warn!(detail = %message, "endpoint returned no reply");
                    self.surface_error(&message);
                    TurnOutcome::Failed
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                self.surface_error(&err.to_string());
                TurnOutcome::Failed
            }
        };

        self.presenter.enable_input();
        outcome
    }

    /// Show a display-only error entry. Errors never enter the history.
    fn surface_error(&mut self, message: &str) {
        let text = format!("Error: {}", message);
        self.presenter
            .append_to_transcript(&self.assistant_label, &text, Role::Assistant);
    }
}

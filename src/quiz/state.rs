use serde::{Deserialize, Serialize};

/// The single next user action a chat is armed for.
///
/// Stored per chat in the dialogue storage; the controller reads it at the
/// start of a turn and returns the replacement in [`Turn::next`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Continuation {
    /// Nothing pending; only `/start` does anything.
    #[default]
    Idle,
    /// A new user was asked for their name.
    AwaitingName,
    /// A round is on screen.
    AwaitingAnswer {
        word_id: i64,
        correct_translation: String,
    },
    /// The leaderboard is on screen with a "continue" control.
    ViewingRating,
}

/// One inbound text message from a user.
#[derive(Debug, Clone)]
pub struct UserAction {
    pub external_id: i64,
    pub chat_id: i64,
    pub text: String,
}

impl UserAction {
    pub fn new(external_id: i64, chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            external_id,
            chat_id,
            text: text.into(),
        }
    }
}

/// Reply keyboard attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// One button per row, in order.
    Options(Vec<String>),
    Remove,
}

/// One outgoing message. `text` is MarkdownV2, already escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(Keyboard::Options(options)),
        }
    }

    pub fn removing_keyboard(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(Keyboard::Remove),
        }
    }
}

/// Result of one controller step: what to send, and what to wait for next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub replies: Vec<Reply>,
    pub next: Continuation,
}

impl Turn {
    pub fn new(replies: Vec<Reply>, next: Continuation) -> Self {
        Self { replies, next }
    }

    /// A turn aborted by a storage failure: nothing is sent and the chat
    /// falls back to [`Continuation::Idle`].
    pub fn silent() -> Self {
        Self {
            replies: Vec::new(),
            next: Continuation::Idle,
        }
    }

    /// Puts `reply` in front of the replies of a follow-up turn.
    pub fn prepend(mut self, reply: Reply) -> Self {
        self.replies.insert(0, reply);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_continuation_is_idle() {
        assert_eq!(Continuation::default(), Continuation::Idle);
    }

    #[test]
    fn test_silent_turn() {
        let turn = Turn::silent();
        assert!(turn.replies.is_empty());
        assert_eq!(turn.next, Continuation::Idle);
    }

    #[test]
    fn test_prepend_keeps_next_state() {
        let turn = Turn::new(vec![Reply::text("second")], Continuation::AwaitingName)
            .prepend(Reply::text("first"));
        assert_eq!(turn.replies[0].text, "first");
        assert_eq!(turn.replies[1].text, "second");
        assert_eq!(turn.next, Continuation::AwaitingName);
    }
}

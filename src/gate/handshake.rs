use super::rules::{GateAction, Verdict};

/// Fixed marker the caller must prefix to the echoed command text.
pub const CONFIRMATION_MARKER: &str = "CONFIRM:";

/// The exact input that confirms execution of `command`.
pub fn confirmation_token(command: &str) -> String {
    format!("{CONFIRMATION_MARKER} {command}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    AwaitingConfirmation,
    Confirmed,
    Aborted,
}

/// What to do with input that is not the exact confirmation token. Both
/// policies keep the hard contract: execution never proceeds while awaiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchPolicy {
    Abort,
    StayAwaiting,
}

/// Two-state confirmation protocol for warn-classified commands. The token
/// is session-scoped: the handshake tracks no expiry of its own, so the
/// calling protocol decides how long the session stays open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationHandshake {
    command: String,
    policy: MismatchPolicy,
    state: HandshakeState,
}

/// Entry point for the handshake: only a warn verdict opens one. Allow needs
/// no confirmation and block permits no override.
pub fn begin_confirmation(
    verdict: &Verdict,
    command: &str,
    policy: MismatchPolicy,
) -> Option<ConfirmationHandshake> {
    if verdict.action != GateAction::Warn {
        return None;
    }
    Some(ConfirmationHandshake {
        command: command.to_string(),
        policy,
        state: HandshakeState::AwaitingConfirmation,
    })
}

impl ConfirmationHandshake {
    pub fn state(&self) -> &HandshakeState {
        &self.state
    }

    pub fn expected_token(&self) -> String {
        confirmation_token(&self.command)
    }

    pub fn may_execute(&self) -> bool {
        self.state == HandshakeState::Confirmed
    }

    /// Confirms only on a character-for-character match of the marker plus
    /// the original command text. No trimming, no paraphrase tolerance.
    /// Terminal states are sticky.
    pub fn submit(&mut self, input: &str) -> &HandshakeState {
        if self.state != HandshakeState::AwaitingConfirmation {
            return &self.state;
        }
        if input == self.expected_token() {
            self.state = HandshakeState::Confirmed;
        } else if self.policy == MismatchPolicy::Abort {
            self.state = HandshakeState::Aborted;
        }
        &self.state
    }

    /// Explicit decline from the caller.
    pub fn decline(&mut self) -> &HandshakeState {
        if self.state == HandshakeState::AwaitingConfirmation {
            self.state = HandshakeState::Aborted;
        }
        &self.state
    }
}

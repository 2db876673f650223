pub mod classifier;
pub mod handshake;
pub mod rules;

pub use classifier::GateEngine;
pub use handshake::{
    begin_confirmation, confirmation_token, ConfirmationHandshake, HandshakeState, MismatchPolicy,
    CONFIRMATION_MARKER,
};
pub use rules::{
    default_rules, load_rules_file, DeleteScope, GateAction, GateRule, RuleMatcher, SqlPattern,
    Verdict,
};

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("failed to read gate rules {path}: {source}")]
    ReadRules {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse gate rules {path}: {source}")]
    ParseRules {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

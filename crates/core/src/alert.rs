//! Alerts produced by classification, before channel-specific rendering.

use serde::{Deserialize, Serialize};

/// Message naming a known wallet involved in a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransparencyMessage {
    /// A known wallet is among the inputs.
    Sent { from: String },
    /// A known wallet is among the outputs.
    Received { to: String },
    /// Known wallets on both sides.
    SentTo { from: String, to: String },
}

impl TransparencyMessage {
    /// Human-readable sentence. Labels are inserted verbatim; callers
    /// rendering markup escape them first via `map_labels`.
    pub fn sentence(&self) -> String {
        match self {
            TransparencyMessage::Sent { from } => {
                format!("🔎🔔 Known wallet \"{}\" sent funds ->", from)
            }
            TransparencyMessage::Received { to } => {
                format!("🔎🔔 Known wallet \"{}\" received funds ->", to)
            }
            TransparencyMessage::SentTo { from, to } => {
                format!("🔎🔔 Known wallet \"{}\" sent funds to \"{}\" ->", from, to)
            }
        }
    }

    /// Apply `f` to every label (used for markup escaping).
    pub fn map_labels(&self, f: impl Fn(&str) -> String) -> Self {
        match self {
            TransparencyMessage::Sent { from } => TransparencyMessage::Sent { from: f(from) },
            TransparencyMessage::Received { to } => TransparencyMessage::Received { to: f(to) },
            TransparencyMessage::SentTo { from, to } => TransparencyMessage::SentTo {
                from: f(from),
                to: f(to),
            },
        }
    }
}

/// What the alert leads with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Headline {
    /// Text of the selected tier.
    Tier(String),
    /// Known-wallet message; replaces the tier text.
    Transparency(TransparencyMessage),
}

/// An alert ready to be formatted for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub txn_hash: String,
    /// Whole WIT.
    pub amount: u64,
    pub headline: Headline,
}

impl Alert {
    pub fn is_transparency(&self) -> bool {
        matches!(self.headline, Headline::Transparency(_))
    }
}

//! Transfer classification: tier selection, probabilistic muting and
//! known-wallet enrichment.

use crate::wallets::KnownWalletTable;
use rand::Rng;
use tracing::debug;
use witwhalert_core::{Alert, AlertTier, AlertTiers, Headline, TransparencyMessage, ValueTransfer};

/// Decides which transfers become alerts.
#[derive(Debug)]
pub struct Classifier {
    tiers: AlertTiers,
    wallets: KnownWalletTable,
}

impl Classifier {
    pub fn new(tiers: AlertTiers, wallets: KnownWalletTable) -> Self {
        Self { tiers, wallets }
    }

    /// Tier for `amount`, kept only if the tier's weight is at least `dice`.
    pub fn classify_with_dice(&self, amount: u64, dice: f64) -> Option<&AlertTier> {
        if amount < self.tiers.floor() {
            return None;
        }
        let tier = self.tiers.select(amount)?;
        if tier.weight >= dice {
            Some(tier)
        } else {
            debug!(amount, tier = tier.limit, weight = tier.weight, dice, "Alert muted");
            None
        }
    }

    /// Same as `classify_with_dice` with a uniform draw in [0, 1).
    pub fn classify<R: Rng + ?Sized>(&self, amount: u64, rng: &mut R) -> Option<&AlertTier> {
        let dice: f64 = rng.gen();
        self.classify_with_dice(amount, dice)
    }

    /// Known-wallet message for a transfer, if any side is labelled.
    pub fn enrich(&self, transfer: &ValueTransfer) -> Option<TransparencyMessage> {
        let from = transfer.inputs.iter().find_map(|a| self.wallets.label(a));
        let to = transfer.outputs.iter().find_map(|a| self.wallets.label(a));

        match (from, to) {
            (Some(from), Some(to)) => Some(TransparencyMessage::SentTo {
                from: from.to_string(),
                to: to.to_string(),
            }),
            (Some(from), None) => Some(TransparencyMessage::Sent {
                from: from.to_string(),
            }),
            (None, Some(to)) => Some(TransparencyMessage::Received { to: to.to_string() }),
            (None, None) => None,
        }
    }

    /// Full decision for one transfer given a dice value.
    ///
    /// Transfers below the floor never alert. Above it, a known wallet
    /// always produces a transparency alert whatever the dice says;
    /// otherwise the tier decides.
    pub fn evaluate_with_dice(&self, transfer: &ValueTransfer, dice: f64) -> Option<Alert> {
        let amount = transfer.amount();
        if amount < self.tiers.floor() {
            return None;
        }

        let headline = match self.enrich(transfer) {
            Some(message) => Headline::Transparency(message),
            None => Headline::Tier(self.classify_with_dice(amount, dice)?.text.clone()),
        };

        Some(Alert {
            txn_hash: transfer.txn_hash.clone(),
            amount,
            headline,
        })
    }

    pub fn evaluate<R: Rng + ?Sized>(&self, transfer: &ValueTransfer, rng: &mut R) -> Option<Alert> {
        let dice: f64 = rng.gen();
        self.evaluate_with_dice(transfer, dice)
    }
}

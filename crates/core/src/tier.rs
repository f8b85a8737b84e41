//! Alert tiers: amount thresholds with a message and a publish probability.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TierError {
    #[error("tier table is empty")]
    Empty,
    #[error("tier limits must be strictly ascending: {previous} is followed by {next}")]
    NotAscending { previous: u64, next: u64 },
    #[error("tier {limit} has weight {weight} outside [0, 1]")]
    WeightOutOfRange { limit: u64, weight: f64 },
}

/// A single amount threshold (in whole WIT).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertTier {
    pub limit: u64,
    /// Probability of publishing a qualifying transfer.
    pub weight: f64,
    pub text: String,
}

impl AlertTier {
    pub fn new(limit: u64, weight: f64, text: impl Into<String>) -> Self {
        Self {
            limit,
            weight,
            text: text.into(),
        }
    }
}

/// Validated tier table, sorted ascending by limit with unique limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AlertTiers(Vec<AlertTier>);

impl AlertTiers {
    /// Validate a tier table. Input must already be sorted; a misordered
    /// table is reported rather than silently reordered.
    pub fn new(tiers: Vec<AlertTier>) -> Result<Self, TierError> {
        if tiers.is_empty() {
            return Err(TierError::Empty);
        }
        for tier in &tiers {
            if !(0.0..=1.0).contains(&tier.weight) {
                return Err(TierError::WeightOutOfRange {
                    limit: tier.limit,
                    weight: tier.weight,
                });
            }
        }
        for pair in tiers.windows(2) {
            if pair[1].limit <= pair[0].limit {
                return Err(TierError::NotAscending {
                    previous: pair[0].limit,
                    next: pair[1].limit,
                });
            }
        }
        Ok(Self(tiers))
    }

    /// Minimum limit. Amounts below it never alert.
    pub fn floor(&self) -> u64 {
        self.0[0].limit
    }

    /// Tier with the greatest limit not exceeding `amount`.
    pub fn select(&self, amount: u64) -> Option<&AlertTier> {
        let mut candidate = None;
        for tier in &self.0 {
            if tier.limit <= amount {
                candidate = Some(tier);
            } else {
                break;
            }
        }
        candidate
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlertTier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for AlertTiers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tiers = Vec::<AlertTier>::deserialize(deserializer)?;
        AlertTiers::new(tiers).map_err(serde::de::Error::custom)
    }
}

impl Default for AlertTiers {
    fn default() -> Self {
        Self(vec![
            AlertTier::new(6_000, 0.05, "🐟🔔 A little fish splashed by ->"),
            AlertTier::new(15_000, 0.15, "🐠🔔 A clownfish popped out of the reef ->"),
            AlertTier::new(45_000, 0.45, "🐡🔔 A parrotfish! Colourful one ->"),
            AlertTier::new(100_000, 0.75, "🐳🔔 A humpback whale! Nice one ->"),
            AlertTier::new(250_000, 1.0, "🐳🐳🔔 Whoa! A finback whale breached! That is BIG ->"),
            AlertTier::new(
                1_000_000,
                1.0,
                "🐳🐳🐳🔔 A-M-A-Z-I-N-G! A blue whale!! Look at the size of that ->",
            ),
        ])
    }
}

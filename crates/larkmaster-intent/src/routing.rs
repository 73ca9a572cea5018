// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence bands that decide whether a classified intent is acted on.

use std::fmt;

use larkmaster_config::IntentConfig;
use larkmaster_core::{CommandType, IntentResult};

/// What the caller should do with a classified intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// Act directly.
    Execute,
    /// Act, but tell the user the request was a guess.
    Uncertain,
    /// Do not act; show usage help instead.
    Clarify,
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceBand::Execute => write!(f, "execute"),
            ConfidenceBand::Uncertain => write!(f, "uncertain"),
            ConfidenceBand::Clarify => write!(f, "clarify"),
        }
    }
}

/// Thresholds mapping confidence to a [`ConfidenceBand`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingPolicy {
    execute_threshold: f32,
    uncertain_threshold: f32,
}

impl RoutingPolicy {
    pub fn new(execute_threshold: f32, uncertain_threshold: f32) -> Self {
        Self {
            execute_threshold,
            uncertain_threshold,
        }
    }

    /// `unknown` is always [`ConfidenceBand::Clarify`], whatever its confidence.
    pub fn band(&self, intent: &IntentResult) -> ConfidenceBand {
        if intent.command_type() == CommandType::Unknown {
            return ConfidenceBand::Clarify;
        }
        self.band_for(intent.confidence())
    }

    pub fn band_for(&self, confidence: f32) -> ConfidenceBand {
        if confidence >= self.execute_threshold {
            ConfidenceBand::Execute
        } else if confidence >= self.uncertain_threshold {
            ConfidenceBand::Uncertain
        } else {
            ConfidenceBand::Clarify
        }
    }
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::from(&IntentConfig::default())
    }
}

impl From<&IntentConfig> for RoutingPolicy {
    fn from(config: &IntentConfig) -> Self {
        Self::new(config.execute_threshold, config.uncertain_threshold)
    }
}

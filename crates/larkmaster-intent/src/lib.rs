// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification for Larkmaster chat messages.
//!
//! This crate provides:
//! - [`IntentClassifier`]: ordered first-match rules over free text
//! - [`RoutingPolicy`]: maps a result's confidence to a [`ConfidenceBand`]
//!
//! Classification is synchronous and pure. Template resolution goes through
//! the injected [`larkmaster_bitable::TemplateCatalog`].

pub mod classifier;
pub mod extract;
pub mod routing;

pub use classifier::{ConfidenceTable, IntentClassifier};
pub use routing::{ConfidenceBand, RoutingPolicy};

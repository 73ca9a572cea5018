// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for Larkmaster integration tests.
//!
//! - [`MockIssuer`] - scripted token issuer that counts issuances
//! - [`MockPlatform`] - in-memory platform that records every call

pub mod mock_issuer;
pub mod mock_platform;

pub use mock_issuer::{IssueStep, MockIssuer};
pub use mock_platform::{MockPlatform, RecordedCall};

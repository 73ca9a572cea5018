// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the core is written against.
//!
//! Both use `#[async_trait]` for dynamic dispatch compatibility, so they can
//! be shared as `Arc<dyn ...>` and swapped for mocks in tests.

pub mod issuer;
pub mod platform;

pub use issuer::TokenIssuer;
pub use platform::PlatformApi;

// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant access token lifecycle.
//!
//! [`CredentialManager`] hands out a token that is valid for at least the
//! configured safety margin, refreshing through a [`larkmaster_core::TokenIssuer`]
//! with at most one refresh in flight. [`TenantTokenIssuer`] is the issuer
//! that talks to the Lark auth endpoint.

pub mod issuer;
pub mod manager;

pub use issuer::TenantTokenIssuer;
pub use manager::{Credential, CredentialManager};

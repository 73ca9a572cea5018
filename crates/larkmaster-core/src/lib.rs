// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Larkmaster assistant.
//!
//! This crate provides the error taxonomy, the two collaborator seams the
//! rest of the workspace is written against ([`TokenIssuer`] and
//! [`PlatformApi`]), and the small set of types they exchange. Nothing here
//! performs I/O.

pub mod error;
pub mod intent;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{
    ApiError, BuildError, CatalogError, CredentialError, LarkError, PartialCreationDetails,
    PartialCreationError, TemplateNotFound,
};
pub use intent::{CommandType, IntentParameters, IntentResult};
pub use types::{AccessToken, CredentialKind, Endpoint, HttpMethod, IssuedToken};

pub use traits::{PlatformApi, TokenIssuer};

// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest implementation of [`larkmaster_core::PlatformApi`].

pub mod client;

pub use client::LarkClient;

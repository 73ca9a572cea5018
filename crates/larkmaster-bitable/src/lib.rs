// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lark Bitable support for Larkmaster.
//!
//! - [`TemplateCatalog`] - named table templates and their trigger keywords
//! - [`SchemaBuilder`] - intent to [`TableDesign`]
//! - [`DocumentationGenerator`] - markdown for a design
//! - [`BitableProvisioner`] - submits a design through the platform seam

pub mod builder;
pub mod catalog;
pub mod docs;
pub mod field;
pub mod provision;
mod templates;

pub use builder::{infer_field, SchemaBuilder, TableDefinition, TableDesign, MAX_NAME_CHARS};
pub use catalog::{CatalogBuilder, TableTemplate, TemplateCatalog};
pub use docs::DocumentationGenerator;
pub use field::{FieldDefinition, FieldType};
pub use provision::{
    BaseWithManual, BitableProvisioner, ProvisionedBase, ProvisionedTable, ResumePoint,
    WikiManual,
};

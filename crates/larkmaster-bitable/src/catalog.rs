// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of named table templates and their trigger keywords.
//!
//! A catalog is assembled once, then shared read-only (usually as
//! `Arc<TemplateCatalog>`). Keyword matching is case-insensitive substring
//! containment over the whole message; when keywords of several templates
//! occur, the template registered first wins.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use larkmaster_core::{CatalogError, TemplateNotFound};

use crate::field::FieldDefinition;
use crate::templates::builtin_templates;

/// A named, predefined table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableTemplate {
    pub name: String,
    pub description: String,
    /// Display order.
    pub fields: Vec<FieldDefinition>,
    /// Trigger keywords as registered; matched case-insensitively.
    pub keywords: Vec<String>,
}

impl TableTemplate {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }
}

/// Immutable template registry with a keyword index.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<TableTemplate>,
    by_name: HashMap<String, usize>,
    /// Lowercased keywords per template, parallel to `templates`.
    keywords: Vec<Vec<String>>,
}

impl TemplateCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The eight templates shipped with Larkmaster.
    pub fn builtin() -> Self {
        let mut catalog = Self {
            templates: Vec::new(),
            by_name: HashMap::new(),
            keywords: Vec::new(),
        };
        for template in builtin_templates() {
            catalog.insert(template);
        }
        catalog
    }

    fn insert(&mut self, template: TableTemplate) {
        self.by_name
            .insert(template.name.clone(), self.templates.len());
        self.keywords
            .push(template.keywords.iter().map(|k| k.to_lowercase()).collect());
        self.templates.push(template);
    }

    pub fn lookup(&self, name: &str) -> Result<&TableTemplate, TemplateNotFound> {
        self.by_name
            .get(name)
            .map(|&i| &self.templates[i])
            .ok_or_else(|| TemplateNotFound {
                name: name.to_string(),
            })
    }

    /// Name of the first registered template with a keyword contained in `text`.
    pub fn keyword_to_template(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        let found = self
            .keywords
            .iter()
            .position(|keywords| keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|i| self.templates[i].name.as_str());
        if let Some(name) = found {
            debug!(template = name, "template keyword matched");
        }
        found
    }

    /// All templates in registration order.
    pub fn list_all(&self) -> &[TableTemplate] {
        &self.templates
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Validating builder for custom catalogs.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    templates: Vec<TableTemplate>,
}

impl CatalogBuilder {
    /// Starts from the built-in templates.
    pub fn with_builtin(mut self) -> Self {
        self.templates.extend(builtin_templates());
        self
    }

    pub fn register(mut self, template: TableTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Validates every template and builds the index.
    pub fn build(self) -> Result<TemplateCatalog, CatalogError> {
        let mut catalog = TemplateCatalog {
            templates: Vec::with_capacity(self.templates.len()),
            by_name: HashMap::new(),
            keywords: Vec::new(),
        };
        let mut claimed: HashMap<String, String> = HashMap::new();

        for template in self.templates {
            if catalog.by_name.contains_key(&template.name) {
                return Err(CatalogError::DuplicateTemplate {
                    name: template.name,
                });
            }

            let mut seen = std::collections::HashSet::new();
            for field in &template.fields {
                let invalid = |reason: String| CatalogError::InvalidField {
                    template: template.name.clone(),
                    field: field.name.clone(),
                    reason,
                };
                field.check().map_err(&invalid)?;
                if !seen.insert(field.name.as_str()) {
                    return Err(invalid("duplicate field name".to_string()));
                }
            }

            for keyword in &template.keywords {
                let key = keyword.to_lowercase();
                if let Some(owner) = claimed.get(&key).filter(|owner| **owner != template.name) {
                    return Err(CatalogError::DuplicateKeyword {
                        keyword: keyword.clone(),
                        template: template.name.clone(),
                        claimed_by: owner.clone(),
                    });
                }
                claimed.insert(key, template.name.clone());
            }

            catalog.insert(template);
        }

        Ok(catalog)
    }
}

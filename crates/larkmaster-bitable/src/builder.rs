// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a classified intent into a concrete table design.
//!
//! A resolved template is copied verbatim into a single-table design. Without
//! a template the builder goes freeform: field types are inferred from the
//! field names, or a fixed default schema is used when none are usable.
//! Building is pure and never touches the platform.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use larkmaster_core::{BuildError, IntentResult};

use crate::catalog::{TableTemplate, TemplateCatalog};
use crate::field::{FieldDefinition, FieldType};

/// Longest accepted base or table name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Freeform field names longer than this are dropped.
const MAX_FIELD_NAME_CHARS: usize = 50;

const FREEFORM_TABLE_NAME: &str = "メインテーブル";
const FREEFORM_TABLE_DESCRIPTION: &str = "自動生成されたテーブル";
const FREEFORM_DESIGN_NAME: &str = "新規Base";
const FREEFORM_DESIGN_DESCRIPTION: &str = "自動生成されたBitable";

/// Keyword groups for freeform type inference, checked in order.
const TYPE_HINTS: &[(FieldType, &[&str])] = &[
    (
        FieldType::Date,
        &["日", "日付", "日時", "date", "開始", "終了", "期限", "締切"],
    ),
    (
        FieldType::Number,
        &["数", "金額", "価格", "数量", "個数", "率", "count", "amount"],
    ),
    (FieldType::Phone, &["電話", "tel", "phone", "携帯"]),
    (
        FieldType::Url,
        &["url", "リンク", "link", "ホームページ", "ウェブ"],
    ),
    (
        FieldType::User,
        &["担当", "責任者", "person", "メンバー", "作成者"],
    ),
    (FieldType::Checkbox, &["フラグ", "flag", "有無", "チェック"]),
    (
        FieldType::Attachment,
        &["添付", "ファイル", "画像", "資料", "attachment"],
    ),
    (
        FieldType::Select,
        &["ステータス", "状態", "種類", "カテゴリ", "優先度", "タイプ"],
    ),
];

/// Generated option sets for freeform SELECT fields, checked in order.
const OPTION_SETS: &[(&[&str], &[&str])] = &[
    (&["ステータス", "状態"], &["未着手", "進行中", "完了", "保留"]),
    (&["優先度", "優先"], &["高", "中", "低"]),
    (
        &["カテゴリ", "種類", "分類"],
        &["カテゴリA", "カテゴリB", "カテゴリC", "その他"],
    ),
];

/// One table of a design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDefinition {
    pub name: String,
    pub description: String,
    pub fields: Vec<FieldDefinition>,
}

impl TableDefinition {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl From<&TableTemplate> for TableDefinition {
    fn from(template: &TableTemplate) -> Self {
        Self {
            name: template.name.clone(),
            description: template.description.clone(),
            fields: template.fields.clone(),
        }
    }
}

/// A base with its ordered tables, ready for documentation or provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDesign {
    pub name: String,
    pub description: String,
    pub tables: Vec<TableDefinition>,
}

/// Builds [`TableDesign`]s against an injected catalog.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    catalog: Arc<TemplateCatalog>,
}

impl SchemaBuilder {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Builds a design for `intent`.
    ///
    /// `override_name` takes precedence over any name in the intent; it is
    /// trimmed and ignored when empty. An override with control characters or
    /// more than [`MAX_NAME_CHARS`] characters is rejected.
    pub fn build(
        &self,
        intent: &IntentResult,
        override_name: Option<&str>,
    ) -> Result<TableDesign, BuildError> {
        let name = match override_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Some(validate_name(name)?),
            None => intent.parameters().name.as_deref().and_then(sanitize_name),
        };

        if let Some(template_name) = intent.template() {
            match self.catalog.lookup(template_name) {
                Ok(template) => {
                    debug!(template = template_name, "building design from template");
                    return Ok(from_template(template, name));
                }
                Err(e) => {
                    warn!(error = %e, "template not in catalog, building freeform design");
                }
            }
        }

        let params = intent.parameters();
        let mut fields = infer_fields(&params.fields)?;
        if fields.is_empty() {
            if !params.fields.is_empty() {
                debug!(given = params.fields.len(), "no usable field names, using default schema");
            }
            fields = default_fields();
        }
        let description = params
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(FREEFORM_DESIGN_DESCRIPTION)
            .to_string();

        Ok(TableDesign {
            tables: vec![TableDefinition {
                name: name.clone().unwrap_or_else(|| FREEFORM_TABLE_NAME.to_string()),
                description: FREEFORM_TABLE_DESCRIPTION.to_string(),
                fields,
            }],
            name: name.unwrap_or_else(|| FREEFORM_DESIGN_NAME.to_string()),
            description,
        })
    }
}

fn from_template(template: &TableTemplate, name: Option<String>) -> TableDesign {
    TableDesign {
        name: name.unwrap_or_else(|| format!("{}Base", template.name)),
        description: format!("{}用のBitable", template.name),
        tables: vec![TableDefinition::from(template)],
    }
}

fn validate_name(name: &str) -> Result<String, BuildError> {
    if name.chars().any(char::is_control) {
        return Err(BuildError::InvalidNameCharacters);
    }
    let len = name.chars().count();
    if len > MAX_NAME_CHARS {
        return Err(BuildError::NameTooLong {
            len,
            max: MAX_NAME_CHARS,
        });
    }
    Ok(name.to_string())
}

/// Names pulled from free text are cleaned rather than rejected.
fn sanitize_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

fn default_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("タイトル", FieldType::Text).required(),
        FieldDefinition::new("説明", FieldType::Text),
        FieldDefinition::new("ステータス", FieldType::Select).with_options(["未着手", "進行中", "完了"]),
        FieldDefinition::new("作成日", FieldType::CreatedTime),
    ]
}

fn infer_fields(names: &[String]) -> Result<Vec<FieldDefinition>, BuildError> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(names.len());

    for name in names {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_FIELD_NAME_CHARS {
            continue;
        }
        if !seen.insert(name) {
            return Err(BuildError::DuplicateField {
                name: name.to_string(),
            });
        }
        fields.push(infer_field(name));
    }

    Ok(fields)
}

/// Infers a field's type and, for SELECT, its options from its name.
pub fn infer_field(name: &str) -> FieldDefinition {
    let lowered = name.to_lowercase();
    let field_type = TYPE_HINTS
        .iter()
        .find(|(_, hints)| hints.iter().any(|h| lowered.contains(h)))
        .map(|(t, _)| *t)
        .unwrap_or(FieldType::Text);

    if field_type != FieldType::Select {
        return FieldDefinition::new(name, field_type);
    }

    match OPTION_SETS
        .iter()
        .find(|(hints, _)| hints.iter().any(|h| lowered.contains(h)))
    {
        Some((_, options)) => {
            FieldDefinition::new(name, FieldType::Select).with_options(options.iter().copied())
        }
        None => FieldDefinition::new(name, FieldType::Text),
    }
}

// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown documentation for table designs.

use std::fmt::Write;

use crate::builder::{TableDefinition, TableDesign};

const USAGE_SECTION: &str = "## 使い方\n\n\
1. 各テーブルにデータを入力してください\n\
2. ビューを切り替えて様々な角度からデータを確認できます\n\
3. フィルターや並び替えで必要な情報を絞り込めます\n";

/// Renders designs as markdown. Output depends only on the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentationGenerator;

impl DocumentationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Full document: base header, every table, then the usage section.
    pub fn generate(&self, design: &TableDesign) -> String {
        let mut out = String::new();
        let _ = write!(out, "# {}\n\n{}\n\n---\n\n", design.name, design.description);
        for table in &design.tables {
            out.push_str(&self.generate_table(table));
            out.push_str("\n---\n\n");
        }
        out.push_str(USAGE_SECTION);
        out
    }

    /// Section for one table with its field list.
    pub fn generate_table(&self, table: &TableDefinition) -> String {
        let mut out = format!("# {}\n\n", table.name);
        if !table.description.is_empty() {
            let _ = write!(out, "{}\n\n", table.description);
        }
        out.push_str("## フィールド一覧\n\n");
        out.push_str("| フィールド名 | タイプ | 説明 |\n");
        out.push_str("|------------|--------|------|\n");

        for field in &table.fields {
            let mut description = field.description.clone();
            if field.field_type.is_choice() && !field.options.is_empty() {
                if !description.is_empty() {
                    description.push(' ');
                }
                let _ = write!(description, "(選択肢: {})", field.options.join(", "));
            }
            let _ = writeln!(
                out,
                "| {} | {} | {} |",
                field.name, field.field_type, description
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDefinition, FieldType};

    fn table() -> TableDefinition {
        TableDefinition {
            name: "タスク".into(),
            description: "日々のタスク".into(),
            fields: vec![
                FieldDefinition::new("件名", FieldType::Text).with_description("短い要約"),
                FieldDefinition::new("状態", FieldType::Select).with_options(["未着手", "完了"]),
                FieldDefinition::new("期限", FieldType::Date),
            ],
        }
    }

    #[test]
    fn table_section_lists_fields_in_order() {
        let md = DocumentationGenerator::new().generate_table(&table());
        let expected = "# タスク\n\n日々のタスク\n\n## フィールド一覧\n\n\
| フィールド名 | タイプ | 説明 |\n\
|------------|--------|------|\n\
| 件名 | TEXT | 短い要約 |\n\
| 状態 | SELECT | (選択肢: 未着手, 完了) |\n\
| 期限 | DATE |  |\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn empty_description_is_omitted() {
        let mut t = table();
        t.description.clear();
        let md = DocumentationGenerator::new().generate_table(&t);
        assert!(md.starts_with("# タスク\n\n## フィールド一覧"));
    }

    #[test]
    fn design_document_wraps_tables_and_usage() {
        let design = TableDesign {
            name: "業務Base".into(),
            description: "業務用".into(),
            tables: vec![table(), table()],
        };
        let md = DocumentationGenerator::new().generate(&design);
        assert!(md.starts_with("# 業務Base\n\n業務用\n\n---\n\n# タスク"));
        assert_eq!(md.matches("## フィールド一覧").count(), 2);
        assert!(md.ends_with(USAGE_SECTION));
    }
}

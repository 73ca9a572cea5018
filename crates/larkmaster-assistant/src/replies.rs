// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed reply texts.

use std::fmt::Write;

use larkmaster_bitable::{ProvisionedBase, TableDesign, TemplateCatalog};
use larkmaster_core::PartialCreationError;

/// Characters of the user's message echoed back in replies.
pub(crate) const ECHO_CHARS: usize = 50;

pub(crate) const UNCERTAIN_NOTE: &str =
    "\n\n⚠️ 意図を推測して実行しました。違う場合は「ヘルプ」で使い方を確認してください。";

/// First `max` characters of `text`, with `...` when it was cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub(crate) fn help(catalog: &TemplateCatalog) -> String {
    let mut text = String::from(
        "🤖 **Larkmaster** へようこそ！\n\n\
以下のことができます：\n\n\
📊 **Bitable (多次元テーブル)**\n\
• 「顧客管理テーブルを作成して」\n\
• 「プロジェクト管理用のベースを作って」\n\
• 「在庫管理システムを構築」\n\n\
📚 **Wiki / ドキュメント**\n\
• 「ナレッジベースを作成」\n\
• 「プロジェクトWikiを作って」\n\
• 「マニュアルを作成」\n\n\
✅ **タスク**\n\
• 「タスクを追加: レビュー依頼」\n\
• 「TODO: 資料作成」\n\n\
🔍 **検索**\n\
• 「〇〇を検索」\n\
• 「△△のドキュメントを探して」\n\n\
💡 **テンプレート**\n\
利用可能なテンプレート:\n",
    );
    for name in catalog.names() {
        let _ = writeln!(text, "• {name}");
    }
    text
}

pub(crate) fn welcome() -> String {
    String::from(
        "🤖 **Larkmaster** がチャットに参加しました！\n\n\
私に@メンションして話しかけると、以下のことができます：\n\n\
📊 **Bitable作成**\n\
「顧客管理テーブルを作成して」\n\
「プロジェクト管理用のベースを作って」\n\n\
📚 **Wiki / ドキュメント**\n\
「Wikiスペースを作成」\n\
「ドキュメントを作成」\n\n\
✅ **タスク**\n\
「タスクを追加: レビュー依頼」\n\n\
💡 **ヘルプ**\n\
「ヘルプ」と入力すると詳しい使い方が見れます！",
    )
}

pub(crate) fn conversation(message: &str) -> String {
    format!(
        "💬 メッセージを受け取りました！\n\n\
「{}」\n\n\
私はLark操作の自動化が得意です。以下のようなことができます：\n\n\
📊 **データ管理**\n\
• 「顧客管理テーブルを作成」\n\
• 「プロジェクト進捗管理のベースを作って」\n\
• 「在庫管理システムを構築」\n\n\
📚 **ドキュメント**\n\
• 「Wikiスペースを作成」\n\
• 「ドキュメントを作成」\n\n\
✅ **タスク**\n\
• 「タスクを追加: 〇〇」\n\n\
具体的にやりたいことを教えていただければ、お手伝いします！\n\
「ヘルプ」で詳しい使い方を確認できます。",
        truncate(message, ECHO_CHARS)
    )
}

pub(crate) fn bitable_created(design: &TableDesign, base: &ProvisionedBase) -> String {
    let mut text = format!(
        "✅ Bitableを作成しました！\n\n**Base名:** {}\n**URL:** {}\n\n",
        design.name, base.url
    );
    if !design.tables.is_empty() {
        text.push_str("**テーブル構成:**\n");
        for table in &design.tables {
            let _ = writeln!(text, "\n📋 {}", table.name);
            for field in &table.fields {
                let _ = writeln!(text, "  • {} ({})", field.name, field.field_type);
            }
        }
    }
    text
}

pub(crate) fn failed(action: &str, error: &dyn std::fmt::Display) -> String {
    format!("❌ {action}に失敗しました: {error}")
}

pub(crate) fn partially_created(action: &str, partial: &PartialCreationError) -> String {
    let mut text = format!(
        "⚠️ {action}が途中で止まりました: {}\n\n**テーブル:** {}\n**App Token:** {}\n",
        partial.source, partial.table, partial.app_token
    );
    if !partial.created.is_empty() {
        let _ = writeln!(text, "**作成済み:** {}", partial.created.join(", "));
    }
    let _ = writeln!(text, "**未作成:** {}", partial.missing.join(", "));
    text.push_str("\n未作成のフィールドだけを再実行できます。");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("短い", 50), "短い");
        assert_eq!(truncate(&"あ".repeat(51), 50), format!("{}...", "あ".repeat(50)));
    }

    #[test]
    fn help_lists_every_template() {
        let catalog = TemplateCatalog::builtin();
        let text = help(&catalog);
        for name in catalog.names() {
            assert!(text.contains(&format!("• {name}\n")), "{name}");
        }
    }
}

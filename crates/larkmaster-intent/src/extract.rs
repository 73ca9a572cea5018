// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parameter extraction from free text.
//!
//! Every function here is total: unmatched input yields `None` or an empty
//! list, never an error.

use std::sync::LazyLock;

use regex::Regex;

/// `名前は X`, `名前: X`, `名前を「X」`.
static NAME_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"名前(?:は|を|[:：])\s*[「『]?([^」』\s、。,]+)").unwrap());

/// First 「…」 or 『…』 quote.
static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[「『]([^」』]+)[」』]").unwrap());

static FIELD_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:フィールド|項目|カラム)(?:は|[:：])\s*(.+)").unwrap());

static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:説明|概要)(?:は|[:：])\s*(.+)").unwrap());

static SEARCH_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:検索|探して|見つけて|search(?:\s+for)?|find)(?:してください|して|ください)?")
        .unwrap()
});

const FIELD_SEPARATORS: &[char] = &[',', '、', '，'];
const QUERY_EDGE: &[char] = &['、', '。', ',', '.', '!', '?', '！', '？', 'を'];

pub fn name(message: &str) -> Option<String> {
    NAME_MARKER
        .captures(message)
        .or_else(|| QUOTED.captures(message))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|n| !n.is_empty())
}

/// Field names after `フィールド:`, `項目:` or `カラム:`, up to any description marker.
pub fn fields(message: &str) -> Vec<String> {
    let Some(list) = FIELD_LIST.captures(message).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    let list = list.as_str();
    let list = match DESCRIPTION.find(list) {
        Some(m) => &list[..m.start()],
        None => list,
    };
    list.split(FIELD_SEPARATORS)
        .map(|f| f.trim().trim_end_matches('。').trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn description(message: &str) -> Option<String> {
    DESCRIPTION
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Text after the first `:` or `：`, trimmed; empty without a delimiter.
pub fn task_title(message: &str) -> String {
    message
        .split_once(|c: char| c == ':' || c == '：')
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

/// The message minus its first search trigger phrase.
pub fn search_query(message: &str) -> String {
    SEARCH_TRIGGER
        .replace(message, "")
        .trim()
        .trim_matches(QUERY_EDGE)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_from_marker_or_quotes() {
        assert_eq!(name("名前は営業リスト、テーブルを作って").as_deref(), Some("営業リスト"));
        assert_eq!(name("名前: 2026採用 で").as_deref(), Some("2026採用"));
        assert_eq!(name("名前を「営業リスト」にしてベースを作成").as_deref(), Some("営業リスト"));
        assert_eq!(name("『週報』というドキュメントを作成").as_deref(), Some("週報"));
        assert_eq!(name("テーブルを作って"), None);
    }

    #[test]
    fn fields_split_on_all_separators() {
        assert_eq!(
            fields("テーブルを作って フィールド: 品名、数量,単価，納期。"),
            ["品名", "数量", "単価", "納期"]
        );
        assert_eq!(
            fields("項目は 件名、期限 説明: 週次レビュー用"),
            ["件名", "期限"]
        );
        assert!(fields("テーブルを作って").is_empty());
    }

    #[test]
    fn description_after_marker() {
        assert_eq!(description("概要: 来期の予算").as_deref(), Some("来期の予算"));
        assert_eq!(description("説明"), None);
    }

    #[test]
    fn task_title_uses_first_delimiter() {
        assert_eq!(task_title("タスクを追加: レビュー依頼"), "レビュー依頼");
        assert_eq!(task_title("TODO：資料作成: 第2版"), "資料作成: 第2版");
        assert_eq!(task_title("タスクを追加"), "");
    }

    #[test]
    fn search_query_strips_trigger_and_particles() {
        assert_eq!(search_query("予算の資料を検索して"), "予算の資料");
        assert_eq!(search_query("議事録を探してください"), "議事録");
        assert_eq!(search_query("Search for quarterly report"), "quarterly report");
        assert_eq!(search_query("検索"), "");
    }
}

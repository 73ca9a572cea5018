// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered first-match intent classification.
//!
//! Messages are matched against a fixed list of rules, top to bottom; the
//! first rule whose trigger fires decides the command. Confidence is a
//! constant per rule, not a score. Matching is case-insensitive substring
//! containment, with no tokenization and no network.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::debug;

use larkmaster_bitable::TemplateCatalog;
use larkmaster_config::IntentConfig;
use larkmaster_core::{CommandType, IntentParameters, IntentResult};

use crate::extract;

/// Per-rule confidence constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceTable {
    pub help: f32,
    pub template_table: f32,
    pub generic_table: f32,
    pub wiki: f32,
    pub document: f32,
    pub task: f32,
    pub search: f32,
}

impl From<&IntentConfig> for ConfidenceTable {
    fn from(config: &IntentConfig) -> Self {
        Self {
            help: config.help,
            template_table: config.template_table,
            generic_table: config.generic_table,
            wiki: config.wiki,
            document: config.document,
            task: config.task,
            search: config.search,
        }
    }
}

impl Default for ConfidenceTable {
    fn default() -> Self {
        Self::from(&IntentConfig::default())
    }
}

/// Fires on any phrase, or on an object word together with a verb.
struct Trigger {
    phrases: &'static [&'static str],
    pairs: &'static [(&'static [&'static str], &'static [&'static str])],
}

impl Trigger {
    fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| text.contains(p))
            || self.pairs.iter().any(|(objects, verbs)| {
                objects.iter().any(|o| text.contains(o)) && verbs.iter().any(|v| text.contains(v))
            })
    }
}

struct Rule {
    name: &'static str,
    /// Removed from the message before the trigger is checked.
    masked: &'static [&'static str],
    trigger: Trigger,
    resolve: fn(&IntentClassifier, &str) -> IntentResult,
}

impl Rule {
    fn applies(&self, lowered: &str) -> bool {
        if self.masked.is_empty() {
            return self.trigger.matches(lowered);
        }
        let mut text = Cow::Borrowed(lowered);
        for word in self.masked {
            if text.contains(word) {
                text = Cow::Owned(text.replace(word, " "));
            }
        }
        self.trigger.matches(&text)
    }
}

const CREATE_VERBS: &[&str] = &[
    "作成", "作って", "作りたい", "作る", "構築", "create", "build", "make",
];

const RULES: &[Rule] = &[
    Rule {
        name: "help",
        masked: &[],
        trigger: Trigger {
            phrases: &["help", "ヘルプ", "使い方", "できること", "何ができる"],
            pairs: &[],
        },
        resolve: IntentClassifier::resolve_help,
    },
    Rule {
        name: "create_bitable",
        masked: &["ナレッジベース", "知識ベース", "knowledge base", "knowledgebase"],
        trigger: Trigger {
            phrases: &[],
            pairs: &[(
                &[
                    "テーブル",
                    "ベース",
                    "base",
                    "bitable",
                    "多次元テーブル",
                    "データベース",
                    "database",
                    "table",
                    "管理システム",
                ],
                CREATE_VERBS,
            )],
        },
        resolve: IntentClassifier::resolve_table,
    },
    Rule {
        name: "create_wiki",
        masked: &[],
        trigger: Trigger {
            phrases: &[],
            pairs: &[
                (&["wiki", "ウィキ", "ナレッジ", "知識ベース", "knowledge base"], CREATE_VERBS),
                (&["ドキュメント"], &["整理", "まとめ"]),
            ],
        },
        resolve: IntentClassifier::resolve_wiki,
    },
    Rule {
        name: "create_document",
        masked: &[],
        trigger: Trigger {
            phrases: &[],
            pairs: &[(&["ドキュメント", "文書", "doc", "マニュアル", "document"], CREATE_VERBS)],
        },
        resolve: IntentClassifier::resolve_document,
    },
    Rule {
        name: "create_task",
        masked: &[],
        trigger: Trigger {
            phrases: &["todo:", "todo："],
            pairs: &[(
                &["タスク", "todo", "やること", "task"],
                &["追加", "作成", "登録", "作って", "add", "create"],
            )],
        },
        resolve: IntentClassifier::resolve_task,
    },
    Rule {
        name: "search",
        masked: &[],
        trigger: Trigger {
            phrases: &["検索", "探して", "見つけて", "search", "find"],
            pairs: &[],
        },
        resolve: IntentClassifier::resolve_search,
    },
];

/// Rule-based classifier over an injected template catalog.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    catalog: Arc<TemplateCatalog>,
    confidence: ConfidenceTable,
}

impl IntentClassifier {
    /// Classifier with the default confidence constants.
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self::with_confidence(catalog, ConfidenceTable::default())
    }

    pub fn with_confidence(catalog: Arc<TemplateCatalog>, confidence: ConfidenceTable) -> Self {
        Self {
            catalog,
            confidence,
        }
    }

    pub fn from_config(catalog: Arc<TemplateCatalog>, config: &IntentConfig) -> Self {
        Self::with_confidence(catalog, ConfidenceTable::from(config))
    }

    /// Rule names in evaluation order.
    pub fn rule_names() -> impl Iterator<Item = &'static str> {
        RULES.iter().map(|r| r.name)
    }

    pub fn confidence(&self) -> &ConfidenceTable {
        &self.confidence
    }

    /// Classifies `message`. Never fails; unmatched input is `unknown`.
    pub fn classify(&self, message: &str) -> IntentResult {
        if message.trim().is_empty() {
            return IntentResult::unknown(message);
        }

        let lowered = message.to_lowercase();
        for rule in RULES {
            if rule.applies(&lowered) {
                let result = (rule.resolve)(self, message);
                debug!(
                    rule = rule.name,
                    command = %result.command_type(),
                    confidence = result.confidence(),
                    "message classified"
                );
                return result;
            }
        }

        debug!("no rule matched, message is unknown");
        IntentResult::unknown(message)
    }

    /// Classifies `message` as a table request regardless of the rules.
    ///
    /// Used where the caller already knows a base is wanted: template
    /// keywords are matched even without a creation verb, and a help word
    /// does not shadow them.
    pub fn classify_table(&self, message: &str) -> IntentResult {
        let result = self.resolve_table(message);
        debug!(
            template = result.template(),
            confidence = result.confidence(),
            "message classified as table request"
        );
        result
    }

    fn resolve_help(&self, message: &str) -> IntentResult {
        IntentResult::new(
            CommandType::Help,
            self.confidence.help,
            IntentParameters::new(message),
        )
    }

    fn resolve_table(&self, message: &str) -> IntentResult {
        let mut params = named(message);
        params.fields = extract::fields(message);
        params.template = self.catalog.keyword_to_template(message).map(str::to_string);
        let confidence = if params.template.is_some() {
            self.confidence.template_table
        } else {
            self.confidence.generic_table
        };
        IntentResult::new(CommandType::CreateBitable, confidence, params)
    }

    fn resolve_wiki(&self, message: &str) -> IntentResult {
        IntentResult::new(CommandType::CreateWiki, self.confidence.wiki, named(message))
    }

    fn resolve_document(&self, message: &str) -> IntentResult {
        IntentResult::new(
            CommandType::CreateDocument,
            self.confidence.document,
            named(message),
        )
    }

    fn resolve_task(&self, message: &str) -> IntentResult {
        let mut params = IntentParameters::new(message);
        params.title = Some(extract::task_title(message));
        IntentResult::new(CommandType::CreateTask, self.confidence.task, params)
    }

    fn resolve_search(&self, message: &str) -> IntentResult {
        let mut params = IntentParameters::new(message);
        params.query = Some(extract::search_query(message));
        IntentResult::new(CommandType::Search, self.confidence.search, params)
    }
}

/// Parameters with the name and description pulled from `message`.
fn named(message: &str) -> IntentParameters {
    let mut params = IntentParameters::new(message);
    params.name = extract::name(message);
    params.description = extract::description(message);
    params
}

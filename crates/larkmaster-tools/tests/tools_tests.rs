// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The built-in registry driven through `ToolRegistry::call`.

use std::sync::Arc;

use larkmaster_bitable::TemplateCatalog;
use larkmaster_config::IntentConfig;
use larkmaster_core::{ApiError, LarkError};
use larkmaster_test_utils::MockPlatform;
use larkmaster_tools::{register_builtins, ToolContext, ToolRegistry};
use serde_json::json;

fn registry(platform: Arc<MockPlatform>) -> ToolRegistry {
    let ctx = ToolContext::new(
        platform,
        Arc::new(TemplateCatalog::builtin()),
        &IntentConfig::default(),
        "https://example.feishu.cn",
    );
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, &ctx);
    registry
}

#[test]
fn every_definition_has_an_object_schema() {
    let registry = registry(Arc::new(MockPlatform::new()));
    let defs = registry.tool_definitions();
    assert_eq!(defs.len(), 9);
    assert_eq!(defs[0]["name"], "analyze_message_intent");
    for def in &defs {
        assert_eq!(def["input_schema"]["type"], "object", "{}", def["name"]);
        assert!(!def["description"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn wiki_manual_follows_the_last_field() {
    let platform = Arc::new(MockPlatform::new());
    let out = registry(platform.clone())
        .call(
            "create_bitable_with_wiki",
            json!({ "message": "プロジェクト管理用のベースを作って" }),
        )
        .await
        .unwrap();

    assert!(out["base"]["app_token"].as_str().unwrap().starts_with("bascnMock"));
    assert!(out["wiki"]["space_id"].as_str().unwrap().starts_with("spaceMock"));
    assert!(out["documentation"].as_str().unwrap().contains("## 使い方"));

    let ids = platform.call_ids().await;
    let last_field = ids.iter().rposition(|id| *id == "add_bitable_field").unwrap();
    let wiki_space = ids.iter().position(|id| *id == "create_wiki_space").unwrap();
    assert!(wiki_space > last_field, "{ids:?}");
    assert_eq!(ids.last(), Some(&"create_wiki_page"));
}

#[tokio::test]
async fn partial_creation_surfaces_as_error() {
    let platform = Arc::new(MockPlatform::new());
    platform
        .fail_after(
            "add_bitable_field",
            2,
            ApiError::Platform {
                endpoint: "add_bitable_field".into(),
                code: 1254045,
                message: "field name duplicated".into(),
            },
        )
        .await;
    let err = registry(platform)
        .call("smart_build_bitable", json!({ "message": "顧客管理テーブルを作成して" }))
        .await
        .unwrap_err();
    match err {
        LarkError::PartialCreation(partial) => {
            assert_eq!(partial.created.len(), 3);
            assert_eq!(partial.failed_field(), Some("電話番号"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_message_is_invalid_input() {
    let err = registry(Arc::new(MockPlatform::new()))
        .call("design_bitable", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, LarkError::InvalidInput(_)));
}

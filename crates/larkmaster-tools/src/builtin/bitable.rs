// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bitable tools: catalog listing, design, documentation, provisioning.

use async_trait::async_trait;
use larkmaster_bitable::ResumePoint;
use larkmaster_core::LarkError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{message_schema, ToolContext};
use crate::tool::{parse_args, to_output, Tool};

#[derive(Deserialize)]
struct DesignArgs {
    message: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    folder_token: Option<String>,
}

/// Lists the template catalog with field names and types.
pub struct ListTemplatesTool {
    ctx: ToolContext,
}

impl ListTemplatesTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ListTemplatesTool {
    fn name(&self) -> &str {
        "list_bitable_templates"
    }

    fn description(&self) -> &str {
        "List the predefined Bitable templates with their fields"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn invoke(&self, _input: Value) -> Result<Value, LarkError> {
        let templates: Vec<Value> = self
            .ctx
            .catalog
            .list_all()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "keywords": t.keywords,
                    "fields": t.fields.iter().map(|f| json!({
                        "name": f.name,
                        "type": f.field_type.to_string(),
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        Ok(json!({ "templates": templates }))
    }
}

/// Designs a base for a message without creating anything.
pub struct DesignBitableTool {
    ctx: ToolContext,
}

impl DesignBitableTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for DesignBitableTool {
    fn name(&self) -> &str {
        "design_bitable"
    }

    fn description(&self) -> &str {
        "Design Bitable tables for a natural-language request without creating them"
    }

    fn parameters_schema(&self) -> Value {
        message_schema("What the base should manage, in natural language", false)
    }

    async fn invoke(&self, input: Value) -> Result<Value, LarkError> {
        let args: DesignArgs = parse_args(self.name(), input)?;
        let (intent, design) = self.ctx.design(&args.message, args.name.as_deref())?;
        Ok(json!({
            "template": intent.template(),
            "design": to_output(&design)?,
        }))
    }
}

pub struct GenerateDocumentationTool {
    ctx: ToolContext,
}

impl GenerateDocumentationTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for GenerateDocumentationTool {
    fn name(&self) -> &str {
        "generate_bitable_documentation"
    }

    fn description(&self) -> &str {
        "Generate markdown documentation for the Bitable designed from a request"
    }

    fn parameters_schema(&self) -> Value {
        message_schema("What the base should manage, in natural language", false)
    }

    async fn invoke(&self, input: Value) -> Result<Value, LarkError> {
        let args: DesignArgs = parse_args(self.name(), input)?;
        let (_, design) = self.ctx.design(&args.message, args.name.as_deref())?;
        Ok(json!({
            "documentation": self.ctx.docs.generate(&design),
            "design_name": design.name,
        }))
    }
}

/// Designs and provisions a base in one step.
pub struct SmartBuildTool {
    ctx: ToolContext,
}

impl SmartBuildTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for SmartBuildTool {
    fn name(&self) -> &str {
        "smart_build_bitable"
    }

    fn description(&self) -> &str {
        "Design and create a Bitable base with its tables and fields from a request"
    }

    fn parameters_schema(&self) -> Value {
        message_schema("What the base should manage, in natural language", true)
    }

    async fn invoke(&self, input: Value) -> Result<Value, LarkError> {
        let args: DesignArgs = parse_args(self.name(), input)?;
        let (_, design) = self.ctx.design(&args.message, args.name.as_deref())?;
        let base = self
            .ctx
            .provisioner
            .provision(&design, args.folder_token.as_deref())
            .await?;
        info!(app_token = %base.app_token, tables = base.tables.len(), "base provisioned");
        Ok(json!({
            "design": to_output(&design)?,
            "base": to_output(&base)?,
        }))
    }
}

/// Provisions a base and publishes its documentation to a new wiki space.
pub struct BuildWithWikiTool {
    ctx: ToolContext,
}

impl BuildWithWikiTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for BuildWithWikiTool {
    fn name(&self) -> &str {
        "create_bitable_with_wiki"
    }

    fn description(&self) -> &str {
        "Create a Bitable base from a request and publish its manual as a wiki page"
    }

    fn parameters_schema(&self) -> Value {
        message_schema("What the base should manage, in natural language", true)
    }

    async fn invoke(&self, input: Value) -> Result<Value, LarkError> {
        let args: DesignArgs = parse_args(self.name(), input)?;
        let (_, design) = self.ctx.design(&args.message, args.name.as_deref())?;
        let created = self
            .ctx
            .provisioner
            .create_with_wiki(&design, args.folder_token.as_deref())
            .await?;
        to_output(&created)
    }
}

#[derive(Deserialize)]
struct ResumeArgs {
    message: String,
    #[serde(default)]
    name: Option<String>,
    partial: ResumePoint,
}

/// Finishes a base an earlier build left partly created.
pub struct ResumeBuildTool {
    ctx: ToolContext,
}

impl ResumeBuildTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ResumeBuildTool {
    fn name(&self) -> &str {
        "resume_bitable_build"
    }

    fn description(&self) -> &str {
        "Create the missing tables and fields of a partly created Bitable base"
    }

    fn parameters_schema(&self) -> Value {
        let mut schema = message_schema("The request the interrupted build was made from", false);
        schema["properties"]["partial"] = json!({
            "type": "object",
            "description": "The `partial` object returned by the failed build",
            "properties": {
                "app_token": { "type": "string" },
                "table": { "type": "string" },
                "table_id": { "type": "string" },
                "created": { "type": "array", "items": { "type": "string" } },
                "missing": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["app_token", "table", "missing"]
        });
        schema["required"] = json!(["message", "partial"]);
        schema
    }

    async fn invoke(&self, input: Value) -> Result<Value, LarkError> {
        let args: ResumeArgs = parse_args(self.name(), input)?;
        let (_, design) = self.ctx.design(&args.message, args.name.as_deref())?;
        let base = self.ctx.provisioner.resume(&args.partial, &design).await?;
        info!(app_token = %base.app_token, tables = base.tables.len(), "base resumed");
        Ok(json!({
            "design": to_output(&design)?,
            "base": to_output(&base)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::builtin::tests::context;
    use larkmaster_test_utils::MockPlatform;

    #[tokio::test]
    async fn lists_all_templates_with_field_types() {
        let tool = ListTemplatesTool::new(context(Arc::new(MockPlatform::new())));
        let out = tool.invoke(json!({})).await.unwrap();
        let templates = out["templates"].as_array().unwrap();
        assert_eq!(templates.len(), 8);
        assert_eq!(templates[0]["name"], "顧客管理");
        assert_eq!(templates[0]["fields"][0], json!({ "name": "会社名", "type": "TEXT" }));
    }

    #[tokio::test]
    async fn design_creates_nothing() {
        let platform = Arc::new(MockPlatform::new());
        let tool = DesignBitableTool::new(context(platform.clone()));
        let out = tool
            .invoke(json!({ "message": "在庫管理システムを構築" }))
            .await
            .unwrap();
        assert_eq!(out["template"], "在庫管理");
        assert_eq!(out["design"]["name"], "在庫管理Base");
        assert!(platform.calls().await.is_empty());
    }

    #[tokio::test]
    async fn design_resolves_template_from_keywords_alone() {
        let tool = DesignBitableTool::new(context(Arc::new(MockPlatform::new())));
        for (message, template) in [
            ("在庫を管理したい", "在庫管理"),
            ("help me build a CRM table", "顧客管理"),
        ] {
            let out = tool.invoke(json!({ "message": message })).await.unwrap();
            assert_eq!(out["template"], template, "{message}");
            assert_eq!(out["design"]["name"], format!("{template}Base"));
        }
    }

    #[tokio::test]
    async fn documentation_names_the_design() {
        let tool = GenerateDocumentationTool::new(context(Arc::new(MockPlatform::new())));
        let out = tool
            .invoke(json!({ "message": "顧客管理テーブルを作成して", "name": "営業台帳" }))
            .await
            .unwrap();
        assert_eq!(out["design_name"], "営業台帳");
        assert!(out["documentation"].as_str().unwrap().starts_with("# 営業台帳\n"));
    }

    #[tokio::test]
    async fn smart_build_passes_folder_token() {
        let platform = Arc::new(MockPlatform::new());
        let tool = SmartBuildTool::new(context(platform.clone()));
        let out = tool
            .invoke(json!({ "message": "顧客管理テーブルを作成して", "folder_token": "fldcn1" }))
            .await
            .unwrap();
        assert_eq!(out["base"]["app_token"], "bascnMock1");
        let calls = platform.calls_to("create_bitable_app").await;
        assert_eq!(calls[0].params["folder_token"], "fldcn1");
    }

    #[tokio::test]
    async fn resume_adds_only_missing_fields() {
        let platform = Arc::new(MockPlatform::new());
        let tool = ResumeBuildTool::new(context(platform.clone()));
        let out = tool
            .invoke(json!({
                "message": "会議メモのテーブルを作って",
                "partial": {
                    "app_token": "bascnOld",
                    "table": "会議メモ",
                    "table_id": "tblOld",
                    "created": ["会議タイトル", "開催日時"],
                    "missing": ["添付ファイル", "作成者"],
                    "failed_field": "添付ファイル"
                }
            }))
            .await
            .unwrap();
        let added: Vec<String> = platform
            .calls_to("add_bitable_field")
            .await
            .iter()
            .map(|c| c.params["field_name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(added, ["添付ファイル", "作成者"]);
        assert!(platform.calls_to("create_bitable_app").await.is_empty());
        assert_eq!(out["base"]["app_token"], "bascnOld");
        assert_eq!(out["base"]["tables"][0]["table_id"], "tblOld");
    }

    #[tokio::test]
    async fn resume_requires_a_resume_point() {
        let tool = ResumeBuildTool::new(context(Arc::new(MockPlatform::new())));
        let err = tool
            .invoke(json!({ "message": "会議メモのテーブルを作って" }))
            .await
            .unwrap_err();
        assert!(matches!(err, LarkError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn rejects_invalid_name_override() {
        let tool = SmartBuildTool::new(context(Arc::new(MockPlatform::new())));
        let err = tool
            .invoke(json!({ "message": "顧客管理テーブルを作成して", "name": "a\u{7}b" }))
            .await
            .unwrap_err();
        assert!(matches!(err, LarkError::Build(_)));
    }
}

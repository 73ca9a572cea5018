// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submits table designs to the platform.
//!
//! A table is created with its first field, then every remaining field is
//! added one call at a time. When a table or field call fails after the app
//! exists, the caller gets a [`PartialCreationError`] naming what was and was
//! not created, and [`BitableProvisioner::resume`] can finish the job.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use larkmaster_core::{ApiError, Endpoint, LarkError, PartialCreationError, PlatformApi};

use crate::builder::{TableDefinition, TableDesign};
use crate::docs::DocumentationGenerator;
use crate::field::FieldDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedTable {
    pub name: String,
    pub table_id: String,
    /// Field names in creation order.
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedBase {
    pub app_token: String,
    pub url: String,
    pub name: String,
    /// Tables created by this call.
    pub tables: Vec<ProvisionedTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WikiManual {
    pub space_id: String,
    pub node_token: Option<String>,
    pub title: String,
}

/// Result of [`BitableProvisioner::create_with_wiki`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseWithManual {
    pub base: ProvisionedBase,
    pub wiki: WikiManual,
    pub documentation: String,
}

/// Where an interrupted provisioning run stopped.
///
/// Field names match the `partial` object reported to callers, so that
/// object can be handed back as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePoint {
    pub app_token: String,
    pub table: String,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub created: Vec<String>,
    pub missing: Vec<String>,
}

impl From<&PartialCreationError> for ResumePoint {
    fn from(partial: &PartialCreationError) -> Self {
        Self {
            app_token: partial.app_token.clone(),
            table: partial.table.clone(),
            table_id: partial.table_id.clone(),
            created: partial.created.clone(),
            missing: partial.missing.clone(),
        }
    }
}

pub struct BitableProvisioner {
    platform: Arc<dyn PlatformApi>,
    web_base_url: String,
    docs: DocumentationGenerator,
}

impl BitableProvisioner {
    /// `web_base_url` builds base links when the platform omits one.
    pub fn new(platform: Arc<dyn PlatformApi>, web_base_url: &str) -> Self {
        Self {
            platform,
            web_base_url: web_base_url.trim_end_matches('/').to_string(),
            docs: DocumentationGenerator::new(),
        }
    }

    /// Creates the base and all of its tables.
    pub async fn provision(
        &self,
        design: &TableDesign,
        folder_token: Option<&str>,
    ) -> Result<ProvisionedBase, LarkError> {
        let mut body = json!({ "name": design.name });
        if let Some(folder) = folder_token.filter(|f| !f.is_empty()) {
            body["folder_token"] = json!(folder);
        }

        let endpoint = Endpoint::CreateBitableApp;
        let id = endpoint.id();
        let data = self.platform.invoke(endpoint, body).await?;
        let app_token = required_str(&data["app"]["app_token"], id, "app.app_token")?;
        let url = data["app"]["url"]
            .as_str()
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.base_url(&app_token));
        info!(app_token = %app_token, name = %design.name, "bitable app created");

        let mut tables = Vec::with_capacity(design.tables.len());
        for table in &design.tables {
            tables.push(self.create_table(&app_token, table).await?);
        }

        Ok(ProvisionedBase {
            app_token,
            url,
            name: design.name.clone(),
            tables,
        })
    }

    /// Adds the fields a previous run left out, then creates any tables of
    /// `design` that come after the interrupted one.
    pub async fn resume(
        &self,
        partial: &ResumePoint,
        design: &TableDesign,
    ) -> Result<ProvisionedBase, LarkError> {
        if partial.app_token.is_empty() {
            return Err(LarkError::InvalidInput("resume point has no app_token".into()));
        }
        let position = design
            .tables
            .iter()
            .position(|t| t.name == partial.table)
            .ok_or_else(|| {
                LarkError::InvalidInput(format!(
                    "table `{}` is not part of design `{}`",
                    partial.table, design.name
                ))
            })?;
        let table = &design.tables[position];
        info!(
            app_token = %partial.app_token,
            table = %partial.table,
            missing = partial.missing.len(),
            "resuming partial table creation"
        );

        let first = match &partial.table_id {
            Some(table_id) => {
                let mut created = partial.created.clone();
                let remaining = table
                    .fields
                    .iter()
                    .filter(|f| partial.missing.contains(&f.name));
                for field in remaining {
                    self.add_field(&partial.app_token, table_id, table, field, &mut created)
                        .await?;
                }
                ProvisionedTable {
                    name: table.name.clone(),
                    table_id: table_id.clone(),
                    fields: created,
                }
            }
            None => self.create_table(&partial.app_token, table).await?,
        };

        let mut tables = vec![first];
        for later in &design.tables[position + 1..] {
            tables.push(self.create_table(&partial.app_token, later).await?);
        }

        Ok(ProvisionedBase {
            app_token: partial.app_token.clone(),
            url: self.base_url(&partial.app_token),
            name: design.name.clone(),
            tables,
        })
    }

    /// Provisions the base, then publishes its documentation as a wiki page.
    ///
    /// The wiki calls start only after every table and field exists.
    pub async fn create_with_wiki(
        &self,
        design: &TableDesign,
        folder_token: Option<&str>,
    ) -> Result<BaseWithManual, LarkError> {
        let base = self.provision(design, folder_token).await?;
        let documentation = self.docs.generate(design);

        let endpoint = Endpoint::CreateWikiSpace;
        let id = endpoint.id();
        let data = self
            .platform
            .invoke(
                endpoint,
                json!({
                    "name": format!("{} Wiki", design.name),
                    "description": format!("{}のドキュメンテーション", design.name),
                }),
            )
            .await?;
        let space_id = required_str(&data["space"]["space_id"], id, "space.space_id")?;

        let title = format!("{} マニュアル", design.name);
        let data = self
            .platform
            .invoke(
                Endpoint::CreateWikiPage {
                    space_id: space_id.clone(),
                },
                json!({ "title": title, "content": documentation }),
            )
            .await?;
        let node_token = data["node"]["node_token"].as_str().map(str::to_string);
        info!(app_token = %base.app_token, space_id = %space_id, "wiki manual created");

        Ok(BaseWithManual {
            base,
            wiki: WikiManual {
                space_id,
                node_token,
                title,
            },
            documentation,
        })
    }

    /// Creates `table`; a failed creation call is reported as a partial base
    /// since the app already exists.
    async fn create_table(
        &self,
        app_token: &str,
        table: &TableDefinition,
    ) -> Result<ProvisionedTable, LarkError> {
        let first: Vec<Value> = table
            .fields
            .first()
            .map(|f| f.to_api_format())
            .into_iter()
            .collect();
        let endpoint = Endpoint::CreateBitableTable {
            app_token: app_token.to_string(),
        };
        let id = endpoint.id();
        let created = self
            .platform
            .invoke(
                endpoint,
                json!({ "table": { "name": table.name, "fields": first } }),
            )
            .await
            .and_then(|data| required_str(&data["table_id"], id, "table_id"));
        let table_id = match created {
            Ok(table_id) => table_id,
            Err(source) => {
                warn!(app_token, table = %table.name, error = %source, "table creation failed");
                return Err(PartialCreationError {
                    app_token: app_token.to_string(),
                    table: table.name.clone(),
                    table_id: None,
                    created: Vec::new(),
                    missing: table.fields.iter().map(|f| f.name.clone()).collect(),
                    source,
                }
                .into());
            }
        };

        let mut created: Vec<String> = table.fields.first().map(|f| f.name.clone()).into_iter().collect();
        for field in table.fields.iter().skip(1) {
            self.add_field(app_token, &table_id, table, field, &mut created)
                .await?;
        }
        info!(app_token, table = %table.name, table_id = %table_id, fields = created.len(), "table provisioned");

        Ok(ProvisionedTable {
            name: table.name.clone(),
            table_id,
            fields: created,
        })
    }

    /// Adds one field; on failure reports everything of `table` not yet in `created`.
    async fn add_field(
        &self,
        app_token: &str,
        table_id: &str,
        table: &TableDefinition,
        field: &FieldDefinition,
        created: &mut Vec<String>,
    ) -> Result<(), LarkError> {
        let endpoint = Endpoint::AddBitableField {
            app_token: app_token.to_string(),
            table_id: table_id.to_string(),
        };
        match self.platform.invoke(endpoint, field.to_api_format()).await {
            Ok(_) => {
                created.push(field.name.clone());
                Ok(())
            }
            Err(source) => {
                let missing: Vec<String> = table
                    .fields
                    .iter()
                    .map(|f| f.name.clone())
                    .filter(|name| !created.contains(name))
                    .collect();
                warn!(
                    app_token,
                    table = %table.name,
                    field = %field.name,
                    missing = missing.len(),
                    error = %source,
                    "field creation failed, table is partial"
                );
                Err(PartialCreationError {
                    app_token: app_token.to_string(),
                    table: table.name.clone(),
                    table_id: Some(table_id.to_string()),
                    created: created.clone(),
                    missing,
                    source,
                }
                .into())
            }
        }
    }

    fn base_url(&self, app_token: &str) -> String {
        format!("{}/base/{app_token}", self.web_base_url)
    }
}

impl std::fmt::Debug for BitableProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitableProvisioner")
            .field("web_base_url", &self.web_base_url)
            .finish_non_exhaustive()
    }
}

fn required_str(value: &Value, endpoint: &str, path: &str) -> Result<String, ApiError> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: format!("response has no `{path}`"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TemplateCatalog;
    use larkmaster_test_utils::MockPlatform;

    fn design(template: &str) -> TableDesign {
        let catalog = TemplateCatalog::builtin();
        let t = catalog.lookup(template).unwrap();
        TableDesign {
            name: format!("{template}Base"),
            description: String::new(),
            tables: vec![TableDefinition::from(t)],
        }
    }

    fn provisioner(platform: Arc<MockPlatform>) -> BitableProvisioner {
        BitableProvisioner::new(platform, "https://example.feishu.cn/")
    }

    #[tokio::test]
    async fn provisions_table_then_remaining_fields_in_order() {
        let platform = Arc::new(MockPlatform::new());
        let design = design("会議メモ");
        let base = provisioner(platform.clone())
            .provision(&design, Some("fldcnFolder"))
            .await
            .unwrap();

        let calls = platform.calls().await;
        assert_eq!(calls.len(), 2 + 7);
        assert_eq!(calls[0].params["folder_token"], "fldcnFolder");
        assert_eq!(calls[1].params["table"]["fields"][0]["field_name"], "会議タイトル");
        let added: Vec<&str> = calls[2..]
            .iter()
            .map(|c| c.params["field_name"].as_str().unwrap())
            .collect();
        assert_eq!(
            added,
            ["開催日時", "参加者", "議事内容", "決定事項", "次回アクション", "添付ファイル", "作成者"]
        );

        assert_eq!(base.app_token, "bascnMock1");
        assert_eq!(base.url, "https://mock.feishu.cn/base/bascnMock1");
        assert_eq!(base.tables[0].fields.len(), 8);
    }

    #[tokio::test]
    async fn missing_url_is_built_from_web_base() {
        let platform = Arc::new(MockPlatform::new());
        platform
            .respond("create_bitable_app", json!({"app": {"app_token": "bascnX"}}))
            .await;
        let base = provisioner(platform).provision(&design("在庫管理"), None).await.unwrap();
        assert_eq!(base.url, "https://example.feishu.cn/base/bascnX");
    }

    #[tokio::test]
    async fn later_table_failure_resumes_from_that_table() {
        let platform = Arc::new(MockPlatform::new());
        let mut two_tables = design("会議メモ");
        two_tables.tables.push(design("在庫管理").tables.remove(0));
        platform
            .fail_after(
                "create_bitable_table",
                1,
                ApiError::Status {
                    endpoint: "create_bitable_table".into(),
                    status: 500,
                    body: String::new(),
                },
            )
            .await;
        let provisioner = provisioner(platform.clone());

        let err = provisioner.provision(&two_tables, None).await.unwrap_err();
        let LarkError::PartialCreation(partial) = err else {
            panic!("expected partial creation, got {err:?}");
        };
        assert_eq!(partial.app_token, "bascnMock1");
        assert_eq!(partial.table, "在庫管理");
        assert_eq!(partial.table_id, None);
        assert_eq!(partial.failed_field(), Some("商品名"));

        let base = provisioner.resume(&ResumePoint::from(&*partial), &two_tables).await.unwrap();
        assert_eq!(base.tables.len(), 1);
        assert_eq!(base.tables[0].name, "在庫管理");
        assert_eq!(platform.calls_to("create_bitable_table").await.len(), 3);
    }

    #[tokio::test]
    async fn app_without_token_is_decode_error() {
        let platform = Arc::new(MockPlatform::new());
        platform.respond("create_bitable_app", json!({"app": {}})).await;
        let err = provisioner(platform.clone())
            .provision(&design("在庫管理"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LarkError::Api(ApiError::Decode { .. })));
        assert_eq!(platform.calls().await.len(), 1);
    }
}

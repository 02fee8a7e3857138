//! Serializable description of a client call, executed by the network actor

use serde_json::Value;

use crate::api::client::ApiClient;
use crate::api::error::{ApiResponse, RequestFailure};
use crate::models::ResourceKind;

/// A successful outcome. Deletes hand back the body alone.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Response(ApiResponse),
    Body(Value),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
    GetMe,
    GetUsers,
    GetDashboardMetrics,
    GetDashboardIssues,
    GetAuthMethods,
    Login { username: String, password: String },
    Logout,
    List(ResourceKind),
    JsonSchema(ResourceKind),
    Create { kind: ResourceKind, payload: Value },
    Update { kind: ResourceKind, key: String, payload: Value },
    Delete { kind: ResourceKind, key: String },
    EnableSuggestion { key: String },
    ValidateDataset { payload: Value },
    RefreshSample { key: String },
}

impl ApiCall {
    /// Short label for logs
    pub fn label(&self) -> String {
        match self {
            ApiCall::List(kind) => format!("list {}", kind.noun()),
            ApiCall::JsonSchema(kind) => format!("{} schema", kind.singular()),
            ApiCall::Create { kind, .. } => format!("create {}", kind.singular()),
            ApiCall::Update { kind, key, .. } => format!("update {} {}", kind.singular(), key),
            ApiCall::Delete { kind, key } => format!("delete {} {}", kind.singular(), key),
            ApiCall::Login { username, .. } => format!("login {}", username),
            ApiCall::ValidateDataset { .. } => String::from("validate dataset"),
            other => format!("{:?}", other),
        }
    }

    pub async fn execute(self, client: &ApiClient) -> Result<Reply, RequestFailure> {
        use ResourceKind as K;

        let response = match self {
            ApiCall::GetMe => client.get_me().await,
            ApiCall::GetUsers => client.get_users().await,
            ApiCall::GetDashboardMetrics => client.get_dashboard_metrics().await,
            ApiCall::GetDashboardIssues => client.get_dashboard_issues().await,
            ApiCall::GetAuthMethods => client.get_auth_methods().await,
            ApiCall::Login { username, password } => client.login(&username, &password).await,
            ApiCall::Logout => client.logout().await,

            ApiCall::List(kind) => match kind {
                K::Team => client.get_teams().await,
                K::Action => client.get_actions().await,
                K::Datasource => client.get_datasources().await,
                K::Dataset => client.get_datasets(None).await,
                K::Expectation => client.get_expectations(None, false, None).await,
                K::Validation => client.get_validations().await,
                K::Suggestion => client.get_suggestions(None, false, None).await,
            },

            ApiCall::JsonSchema(kind) => match kind {
                K::Action => client.get_actions_json_schema().await,
                K::Datasource => client.get_datasources_json_schema().await,
                K::Expectation => client.get_expectations_json_schema().await,
                other => Err(unsupported("json schema", other)),
            },

            ApiCall::Create { kind, payload } => match kind {
                K::Team => client.post_team(&payload).await,
                K::Action => client.post_action(&payload).await,
                K::Datasource => client.post_datasource(&payload).await,
                K::Dataset => client.post_dataset(&payload).await,
                K::Expectation => client.post_expectation(&payload).await,
                other => Err(unsupported("create", other)),
            },

            ApiCall::Update { kind, key, payload } => match kind {
                K::Team => client.put_team(&payload, &key).await,
                K::Action => client.put_action(&payload, &key).await,
                K::Datasource => client.put_datasource(&payload, &key).await,
                K::Dataset => client.put_dataset(&key, &payload).await,
                K::Expectation => client.put_expectation(&payload, &key).await,
                other => Err(unsupported("update", other)),
            },

            ApiCall::Delete { kind, key } => {
                let body = match kind {
                    K::Team => client.delete_team(&key).await,
                    K::Action => client.delete_action(&key).await,
                    K::Datasource => client.delete_datasource(&key).await,
                    K::Expectation => client.delete_expectation(&key).await,
                    K::Suggestion => client.delete_suggestion(&key).await,
                    K::Dataset => return client.delete_dataset(&key).await.map(Reply::Response),
                    other => Err(unsupported("delete", other)),
                };
                return body.map(Reply::Body);
            }

            ApiCall::EnableSuggestion { key } => client.enable_suggestion(&key).await,
            ApiCall::ValidateDataset { payload } => client.post_runner_validate_dataset(&payload).await,
            ApiCall::RefreshSample { key } => client.put_sample(&key).await,
        };

        response.map(Reply::Response)
    }
}

fn unsupported(verb: &str, kind: ResourceKind) -> RequestFailure {
    RequestFailure::Setup(format!("{} is not supported for {}", verb, kind.noun()))
}

use card_sync::ledger::Ledger;
use card_sync::{Error, Label, LabelId, Result, TransactionId, TransactionPage};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::queries;
use crate::wire::{
    GraphQlResponse, MutationPayload, SetTransactionTagsData, TagsData, TransactionsData,
    UpdateTransactionData,
};

pub const DEFAULT_API_URL: &str = "https://api.monarch.com/graphql";

/// Labels requested from the household catalog.
const TAG_LIMIT: usize = 500;

/// Monarch GraphQL client, holding the credentials of one run.
pub struct MonarchClient {
    http: reqwest::Client,
    url: String,
}

fn transport(error: reqwest::Error) -> Error {
    Error::Transport(error.to_string())
}

/// Body of a failed response, or why it could not be read.
fn error_body<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|error| format!("<body unreadable: {error}>"))
}

fn invalid_token() -> Error {
    Error::InvalidSetting {
        name: "MONARCH_API_TOKEN".into(),
        reason: "contains characters not allowed in an HTTP header".into(),
    }
}

impl MonarchClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_url(token, DEFAULT_API_URL)
    }

    pub fn with_url(token: &str, url: impl Into<String>) -> Result<Self> {
        // the web app sends "Token <token>", not a bearer token
        let value = format!("Token {token}");
        let mut authorization = HeaderValue::from_str(&value).map_err(|_| invalid_token())?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert("client-platform", HeaderValue::from_static("web"));
        headers.insert(
            "monarch-client",
            HeaderValue::from_static("monarch-core-web-app-graphql"),
        );

        let http = reqwest::Client::builder()
            .user_agent(format!("card-sync/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(transport)?;

        Ok(MonarchClient {
            http,
            url: url.into(),
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        debug!("GraphQL {operation} {variables}");
        let payload = json!({
            "operationName": operation,
            "query": query,
            "variables": variables,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            return Err(Error::Transport(format!(
                "{operation}: HTTP {status}: {body}"
            )));
        }

        let response: GraphQlResponse = response.json().await.map_err(transport)?;
        response.into_data(operation)
    }
}

impl Ledger for MonarchClient {
    async fn transactions_page(
        &self,
        account_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<TransactionPage> {
        let variables = json!({
            "offset": offset,
            "limit": limit,
            "orderBy": "date",
            "filters": {
                "accounts": [account_id],
                "transactionVisibility": "all_transactions",
            },
        });
        let data: TransactionsData = self
            .execute(
                queries::GET_TRANSACTIONS,
                queries::GET_TRANSACTIONS_QUERY,
                variables,
            )
            .await?;
        Ok(data.all_transactions.into())
    }

    async fn labels(&self) -> Result<Vec<Label>> {
        let variables = json!({
            "search": null,
            "limit": TAG_LIMIT,
            "bulkParams": null,
        });
        let data: TagsData = self
            .execute(queries::GET_TAGS, queries::GET_TAGS_QUERY, variables)
            .await?;
        Ok(data
            .household_transaction_tags
            .unwrap_or_default()
            .into_iter()
            .map(Label::from)
            .collect())
    }

    async fn set_ownership_shared(&self, transaction: &TransactionId) -> Result<()> {
        // a null owner is how Monarch represents shared ownership
        let variables = json!({
            "input": {
                "id": transaction,
                "ownerUserId": null,
            },
        });
        let data: UpdateTransactionData = self
            .execute(
                queries::UPDATE_TRANSACTION,
                queries::UPDATE_TRANSACTION_MUTATION,
                variables,
            )
            .await?;
        MutationPayload::check(data.update_transaction, queries::UPDATE_TRANSACTION)
    }

    async fn replace_labels(&self, transaction: &TransactionId, labels: &[LabelId]) -> Result<()> {
        let variables = json!({
            "input": {
                "transactionId": transaction,
                "tagIds": labels,
            },
        });
        let data: SetTransactionTagsData = self
            .execute(queries::SET_TAGS, queries::SET_TAGS_MUTATION, variables)
            .await?;
        MutationPayload::check(data.set_transaction_tags, queries::SET_TAGS)
    }
}

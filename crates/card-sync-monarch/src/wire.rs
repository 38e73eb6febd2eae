//! Response shapes of the GraphQL operations, and their conversion into `card_sync` types.

use card_sync::{
    Date, Decimal, Error, Label, LabelId, Ownership, Result, Transaction, TransactionId,
    TransactionPage,
};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};

#[derive(Deserialize)]
pub(crate) struct GraphQlResponse {
    data: Option<serde_json::Value>,
    errors: Option<serde_json::Value>,
}

impl GraphQlResponse {
    /// Top-level `errors` win over any partial `data`.
    pub(crate) fn into_data<T: DeserializeOwned>(self, operation: &str) -> Result<T> {
        if let Some(errors) = self.errors {
            return Err(Error::Remote(format!("{operation}: {errors}")));
        }
        let data = self
            .data
            .ok_or_else(|| Error::Remote(format!("{operation}: response has no data")))?;
        serde_json::from_value(data)
            .map_err(|e| Error::Transport(format!("{operation}: unexpected response: {e}")))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionsData {
    pub all_transactions: AllTransactions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AllTransactions {
    total_count: Option<usize>,
    total_selectable_count: Option<usize>,
    #[serde(default)]
    results: Vec<RawTransaction>,
}

impl From<AllTransactions> for TransactionPage {
    fn from(all: AllTransactions) -> Self {
        // a selectable count of 0 is not trusted, the plain count is used instead
        let total = all
            .total_selectable_count
            .filter(|&count| count > 0)
            .or(all.total_count)
            .unwrap_or(0);

        TransactionPage {
            transactions: all.results.into_iter().map(Transaction::from).collect(),
            total,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    id: String,
    date: Date,
    amount: Decimal,
    plaid_name: Option<String>,
    notes: Option<String>,
    merchant: Option<RawMerchant>,
    tags: Option<Vec<RawTag>>,
    owned_by_user: Option<IgnoredAny>,
}

#[derive(Deserialize)]
struct RawMerchant {
    name: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct RawTag {
    id: String,
    name: String,
}

impl From<RawTag> for Label {
    fn from(tag: RawTag) -> Self {
        Label {
            id: LabelId(tag.id),
            name: tag.name,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        Transaction {
            id: TransactionId(raw.id),
            date: raw.date,
            amount: raw.amount,
            merchant: raw
                .merchant
                .and_then(|merchant| merchant.name)
                .unwrap_or_default(),
            description: non_empty(raw.plaid_name)
                .or_else(|| non_empty(raw.notes))
                .unwrap_or_default(),
            ownership: Ownership::from_owner(raw.owned_by_user),
            labels: raw
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(Label::from)
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TagsData {
    pub household_transaction_tags: Option<Vec<RawTag>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateTransactionData {
    pub update_transaction: Option<MutationPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetTransactionTagsData {
    pub set_transaction_tags: Option<MutationPayload>,
}

/// Mutations report application errors inside their payload, next to a successful HTTP status.
#[derive(Deserialize)]
pub(crate) struct MutationPayload {
    errors: Option<PayloadErrors>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadErrors {
    message: Option<String>,
    code: Option<String>,
    field_errors: Option<Vec<FieldError>>,
}

#[derive(Deserialize)]
struct FieldError {
    field: String,
    #[serde(default)]
    messages: Vec<String>,
}

impl MutationPayload {
    pub(crate) fn check(payload: Option<Self>, operation: &str) -> Result<()> {
        let Some(errors) = payload.and_then(|payload| payload.errors) else {
            return Ok(());
        };

        let mut problems = Vec::new();
        if let Some(message) = errors.message {
            match errors.code {
                Some(code) => problems.push(format!("{message} ({code})")),
                None => problems.push(message),
            }
        }
        for field_error in errors.field_errors.unwrap_or_default() {
            problems.push(format!(
                "{}: {}",
                field_error.field,
                field_error.messages.join(", ")
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            let problems = problems.join("; ");
            Err(Error::Remote(format!("{operation}: {problems}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Transaction {
        serde_json::from_value::<RawTransaction>(value)
            .unwrap()
            .into()
    }

    #[test]
    fn normalizes_full_transaction() {
        let transaction = parse(json!({
            "id": "160",
            "amount": -12.5,
            "date": "2025-02-03",
            "plaidName": "AMZN Mktp",
            "notes": "gift",
            "merchant": { "id": "9", "name": "Amazon", "__typename": "Merchant" },
            "tags": [{ "id": "t1", "name": "Travel", "__typename": "TransactionTag" }],
            "ownedByUser": { "id": "u1", "__typename": "User" },
            "__typename": "Transaction"
        }));

        assert_eq!(transaction.id, TransactionId("160".into()));
        assert_eq!(transaction.date.to_string(), "2025-02-03");
        assert_eq!(transaction.amount, "-12.50".parse::<Decimal>().unwrap());
        assert_eq!(transaction.merchant, "Amazon");
        assert_eq!(transaction.description, "AMZN Mktp");
        assert_eq!(transaction.ownership, Ownership::Individual);
        assert_eq!(transaction.labels, [Label::new("t1", "Travel")]);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let transaction = parse(json!({
            "id": "161",
            "amount": 3,
            "date": "2025-02-04",
            "plaidName": "",
            "notes": "split with Sam",
            "merchant": null,
            "tags": null,
            "ownedByUser": null
        }));

        assert_eq!(transaction.merchant, "");
        assert_eq!(transaction.description, "split with Sam");
        assert_eq!(transaction.ownership, Ownership::Shared);
        assert!(transaction.labels.is_empty());
    }

    #[test]
    fn absent_owner_is_shared() {
        let transaction = parse(json!({
            "id": "162",
            "amount": "1.00",
            "date": "2025-02-04"
        }));

        assert_eq!(transaction.ownership, Ownership::Shared);
        assert_eq!(transaction.description, "");
    }

    #[test]
    fn page_total_prefers_selectable_count() {
        let page: TransactionPage = serde_json::from_value::<AllTransactions>(json!({
            "totalCount": 10,
            "totalSelectableCount": 7,
            "results": []
        }))
        .unwrap()
        .into();
        assert_eq!(page.total, 7);

        let page: TransactionPage = serde_json::from_value::<AllTransactions>(json!({
            "totalCount": 10,
            "totalSelectableCount": 0,
            "results": []
        }))
        .unwrap()
        .into();
        assert_eq!(page.total, 10);

        let page: TransactionPage = serde_json::from_value::<AllTransactions>(json!({
            "results": []
        }))
        .unwrap()
        .into();
        assert_eq!(page.total, 0);
    }

    #[test]
    fn graphql_errors_win_over_data() {
        let response: GraphQlResponse = serde_json::from_value(json!({
            "data": { "allTransactions": null },
            "errors": [{ "message": "not authorized" }]
        }))
        .unwrap();

        let error = response
            .into_data::<TransactionsData>("Web_GetTransactionsList")
            .err()
            .unwrap();

        assert!(matches!(error, Error::Remote(ref message) if message.contains("not authorized")));
    }

    #[test]
    fn empty_payload_errors_are_success() {
        let payload: MutationPayload = serde_json::from_value(json!({
            "errors": { "message": null, "code": null, "fieldErrors": [] }
        }))
        .unwrap();

        assert!(MutationPayload::check(Some(payload), "op").is_ok());
        assert!(MutationPayload::check(None, "op").is_ok());
    }

    #[test]
    fn payload_errors_are_remote_errors() {
        let payload: MutationPayload = serde_json::from_value(json!({
            "errors": {
                "message": "Invalid input",
                "code": "BAD_REQUEST",
                "fieldErrors": [{ "field": "tagIds", "messages": ["unknown tag", "try again"] }]
            }
        }))
        .unwrap();

        let error = MutationPayload::check(Some(payload), "Web_SetTransactionTags").unwrap_err();

        assert_eq!(
            error.to_string(),
            "Ledger reported errors: Web_SetTransactionTags: Invalid input (BAD_REQUEST); tagIds: unknown tag, try again"
        );
    }
}

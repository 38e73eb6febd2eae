//! GraphQL documents, as sent by the Monarch web app.

pub const GET_TRANSACTIONS: &str = "Web_GetTransactionsList";
pub const GET_TRANSACTIONS_QUERY: &str = r#"
query Web_GetTransactionsList(
  $offset: Int,
  $limit: Int,
  $filters: TransactionFilterInput,
  $orderBy: TransactionOrdering
) {
  allTransactions(filters: $filters) {
    totalCount
    totalSelectableCount
    results(offset: $offset, limit: $limit, orderBy: $orderBy) {
      id
      amount
      date
      plaidName
      notes
      merchant {
        id
        name
        __typename
      }
      tags {
        id
        name
        __typename
      }
      ownedByUser {
        id
        __typename
      }
      __typename
    }
    __typename
  }
}
"#;

pub const GET_TAGS: &str = "GetHouseholdTransactionTags";
pub const GET_TAGS_QUERY: &str = r#"
query GetHouseholdTransactionTags(
  $search: String,
  $limit: Int,
  $bulkParams: BulkTransactionDataParams
) {
  householdTransactionTags(search: $search, limit: $limit, bulkParams: $bulkParams) {
    id
    name
    __typename
  }
}
"#;

pub const UPDATE_TRANSACTION: &str = "Web_UpdateTransactionOverview";
pub const UPDATE_TRANSACTION_MUTATION: &str = r#"
mutation Web_UpdateTransactionOverview($input: UpdateTransactionMutationInput!) {
  updateTransaction(input: $input) {
    transaction {
      id
      __typename
    }
    errors {
      ...PayloadErrorFields
      __typename
    }
    __typename
  }
}

fragment PayloadErrorFields on PayloadError {
  fieldErrors {
    field
    messages
    __typename
  }
  message
  code
  __typename
}
"#;

pub const SET_TAGS: &str = "Web_SetTransactionTags";
pub const SET_TAGS_MUTATION: &str = r#"
mutation Web_SetTransactionTags($input: SetTransactionTagsInput!) {
  setTransactionTags(input: $input) {
    transaction {
      id
      tags {
        id
        name
        __typename
      }
      __typename
    }
    errors {
      ...PayloadErrorFields
      __typename
    }
    __typename
  }
}

fragment PayloadErrorFields on PayloadError {
  fieldErrors {
    field
    messages
    __typename
  }
  message
  code
  __typename
}
"#;

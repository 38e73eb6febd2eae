//! The capabilities the sync needs from the remote ledger.

use crate::{Label, LabelId, Result, TransactionId, TransactionPage};

/// Remote ledger holding both card accounts.
///
/// Implementations make one request per call and never retry; a failed call
/// aborts the whole run.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// Up to `limit` transactions of `account_id`, starting at `offset`, ordered by date.
    async fn transactions_page(
        &self,
        account_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<TransactionPage>;

    /// The household's full label catalog.
    async fn labels(&self) -> Result<Vec<Label>>;

    /// Clear the owning user of a transaction, making it shared.
    async fn set_ownership_shared(&self, transaction: &TransactionId) -> Result<()>;

    /// Replace the whole label set of a transaction.
    async fn replace_labels(&self, transaction: &TransactionId, labels: &[LabelId]) -> Result<()>;
}

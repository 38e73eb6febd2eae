use futures::{Stream, TryStreamExt as _};
use tracing::{debug, info};

use crate::ledger::Ledger;
use crate::{Error, LabelId, Result, Transaction};

/// Transactions requested per page.
pub const PAGE_SIZE: usize = 200;

/// Lazily page through all transactions of an account.
///
/// Stops once the number of fetched transactions reaches the total reported by
/// the ledger, or when a page comes back empty. Calling this again restarts
/// from the first page.
pub fn transaction_pages<'a, L: Ledger>(
    ledger: &'a L,
    account_id: &'a str,
) -> impl Stream<Item = Result<Vec<Transaction>>> + 'a {
    futures::stream::try_unfold(Some(0), move |offset| async move {
        let Some(offset) = offset else {
            return Ok::<_, Error>(None);
        };

        let page = ledger
            .transactions_page(account_id, offset, PAGE_SIZE)
            .await?;
        if page.transactions.is_empty() {
            debug!("account {account_id}: empty page at offset {offset}");
            return Ok(None);
        }

        let fetched = offset + page.transactions.len();
        debug!(
            "account {account_id}: fetched {fetched} of {} transactions",
            page.total
        );
        let next = (fetched < page.total).then_some(fetched);
        Ok(Some((page.transactions, next)))
    })
}

/// Fetch the complete transaction history of an account, in ledger order.
pub async fn list_transactions<L: Ledger>(
    ledger: &L,
    account_id: &str,
) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = transaction_pages(ledger, account_id).try_concat().await?;
    info!(
        "Fetched {} transactions for account {account_id}",
        transactions.len()
    );
    Ok(transactions)
}

/// Look up the id of the label called `name`, ignoring case.
///
/// Labels are never created here: creating one is left to the user.
pub async fn resolve_label<L: Ledger>(ledger: &L, name: &str) -> Result<LabelId> {
    let labels = ledger.labels().await?;
    labels
        .into_iter()
        .find(|label| label.is_named(name))
        .map(|label| label.id)
        .ok_or_else(|| Error::LabelNotFound {
            name: name.to_owned(),
        })
}

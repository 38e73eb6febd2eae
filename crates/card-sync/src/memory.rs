//! An in-memory [`Ledger`], used to exercise a sync without a remote service.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::ledger::Ledger;
use crate::reconcile::Mutation;
use crate::{
    Error, Label, LabelId, Ownership, Result, Transaction, TransactionId, TransactionPage,
};

#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<MemoryLedgerInner>,
    page_size: Option<usize>,
    reported_total: Option<usize>,
    failing_reads: bool,
    fail_after_mutations: Option<usize>,
}

#[derive(Default)]
struct MemoryLedgerInner {
    accounts: BTreeMap<String, Vec<Transaction>>,
    labels: Vec<Label>,
    page_requests: usize,
    mutations: Vec<Mutation>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(self, account_id: &str, transactions: Vec<Transaction>) -> Self {
        self.lock()
            .accounts
            .entry(account_id.to_owned())
            .or_default()
            .extend(transactions);
        self
    }

    pub fn with_label(self, label: Label) -> Self {
        self.lock().labels.push(label);
        self
    }

    /// Return at most `page_size` transactions per page, whatever the caller asks for.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Report `total` as the size of every listing instead of the real count.
    pub fn with_reported_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Fail every read with a transport error.
    pub fn failing_reads(mut self) -> Self {
        self.failing_reads = true;
        self
    }

    /// Accept `count` mutations, then fail every further one with a transport error.
    pub fn fail_after_mutations(mut self, count: usize) -> Self {
        self.fail_after_mutations = Some(count);
        self
    }

    /// Let mutations succeed again, as after a network outage is over.
    pub fn recover(&mut self) {
        self.fail_after_mutations = None;
    }

    pub fn transactions(&self, account_id: &str) -> Vec<Transaction> {
        self.lock()
            .accounts
            .get(account_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn labels_snapshot(&self) -> Vec<Label> {
        self.lock().labels.clone()
    }

    /// Every mutation applied so far, in order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock().mutations.clone()
    }

    pub fn page_requests(&self) -> usize {
        self.lock().page_requests
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryLedgerInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_mutation_allowed(&self, inner: &MemoryLedgerInner) -> Result<()> {
        match self.fail_after_mutations {
            Some(limit) if inner.mutations.len() >= limit => {
                Err(Error::Transport("connection reset by peer".into()))
            }
            _ => Ok(()),
        }
    }
}

impl MemoryLedgerInner {
    fn transaction_mut(&mut self, id: &TransactionId) -> Result<&mut Transaction> {
        self.accounts
            .values_mut()
            .flatten()
            .find(|transaction| &transaction.id == id)
            .ok_or_else(|| Error::Remote(format!("transaction {id} not found")))
    }
}

impl Ledger for MemoryLedger {
    async fn transactions_page(
        &self,
        account_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<TransactionPage> {
        if self.failing_reads {
            return Err(Error::Transport("connection refused".into()));
        }

        let mut inner = self.lock();
        inner.page_requests += 1;

        let all = inner
            .accounts
            .get(account_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let limit = self.page_size.map_or(limit, |size| size.min(limit));
        let transactions = all.iter().skip(offset).take(limit).cloned().collect();

        Ok(TransactionPage {
            transactions,
            total: self.reported_total.unwrap_or(all.len()),
        })
    }

    async fn labels(&self) -> Result<Vec<Label>> {
        if self.failing_reads {
            return Err(Error::Transport("connection refused".into()));
        }
        Ok(self.labels_snapshot())
    }

    async fn set_ownership_shared(&self, transaction: &TransactionId) -> Result<()> {
        let mut inner = self.lock();
        self.check_mutation_allowed(&inner)?;

        inner.transaction_mut(transaction)?.ownership = Ownership::Shared;
        inner
            .mutations
            .push(Mutation::SetOwnershipShared(transaction.clone()));
        Ok(())
    }

    async fn replace_labels(&self, transaction: &TransactionId, labels: &[LabelId]) -> Result<()> {
        let mut inner = self.lock();
        self.check_mutation_allowed(&inner)?;

        let resolved = labels
            .iter()
            .map(|id| {
                inner
                    .labels
                    .iter()
                    .find(|label| &label.id == id)
                    .cloned()
                    .ok_or_else(|| Error::Remote(format!("label {id} not found")))
            })
            .collect::<Result<Vec<_>>>()?;

        inner.transaction_mut(transaction)?.labels = resolved;
        inner.mutations.push(Mutation::ReplaceLabels {
            transaction: transaction.clone(),
            labels: labels.to_vec(),
        });
        Ok(())
    }
}

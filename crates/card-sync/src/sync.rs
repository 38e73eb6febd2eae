//! One complete sync run: fetch, reconcile, apply.

use tracing::{debug, info};

use crate::apply::{self, Mode};
use crate::ledger::Ledger;
use crate::reconcile::{Outcome, Summary, SyncLabel, reconcile};
use crate::{Result, TransactionId, list_transactions, resolve_label};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub primary_account: String,
    pub additional_account: String,
    /// Name of the label marking synced additional-card transactions.
    pub label: String,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Additional-card transactions that did not carry the sync label yet.
    pub candidates: usize,
    /// Classification of every candidate, in additional-card fetch order.
    pub outcomes: Vec<(TransactionId, Outcome)>,
    pub summary: Summary,
    pub mode: Mode,
}

/// Sync the additional card into the primary card.
///
/// Everything is re-read from the ledger; nothing is kept between runs. The
/// first failing request aborts the run, and running again picks up where the
/// failed run stopped.
pub async fn run<L: Ledger>(ledger: &L, options: &SyncOptions) -> Result<SyncReport> {
    info!("Fetching transactions...");
    let primary = list_transactions(ledger, &options.primary_account).await?;
    let additional = list_transactions(ledger, &options.additional_account).await?;
    let label = SyncLabel {
        id: resolve_label(ledger, &options.label).await?,
        name: options.label.clone(),
    };

    let reconciliation = reconcile(&primary, &additional, &label);
    info!(
        "Additional-card transactions without '{}' label: {}",
        label.name,
        reconciliation.decisions.len()
    );

    for decision in &reconciliation.decisions {
        info!("{decision}");
        apply::apply(ledger, decision, options.mode).await?;
    }
    debug!(
        "{} of {} synced\n{}",
        reconciliation.summary.synced(),
        reconciliation.decisions.len(),
        reconciliation.summary
    );

    let outcomes = reconciliation
        .decisions
        .iter()
        .map(|decision| (decision.transaction.id.clone(), decision.outcome))
        .collect();

    Ok(SyncReport {
        candidates: reconciliation.decisions.len(),
        outcomes,
        summary: reconciliation.summary,
        mode: options.mode,
    })
}

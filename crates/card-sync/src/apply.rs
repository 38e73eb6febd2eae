//! Carrying out reconciliation decisions against the ledger.

use tracing::info;

use crate::Result;
use crate::ledger::Ledger;
use crate::reconcile::{Decision, Mutation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only log what would change.
    DryRun,
    Live,
}

impl Mode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Mode::DryRun } else { Mode::Live }
    }

    pub fn is_dry_run(self) -> bool {
        self == Mode::DryRun
    }
}

/// Apply the mutations of one decision, in order, stopping at the first failure.
///
/// In [`Mode::DryRun`] the ledger is not touched at all.
pub async fn apply<L: Ledger>(ledger: &L, decision: &Decision<'_>, mode: Mode) -> Result<()> {
    for mutation in &decision.mutations {
        match mode {
            Mode::DryRun => info!("  DRY RUN: would {mutation}"),
            Mode::Live => {
                execute(ledger, mutation).await?;
                info!("  updated: {mutation}");
            }
        }
    }
    Ok(())
}

async fn execute<L: Ledger>(ledger: &L, mutation: &Mutation) -> Result<()> {
    match mutation {
        Mutation::SetOwnershipShared(transaction) => ledger.set_ownership_shared(transaction).await,
        Mutation::ReplaceLabels {
            transaction,
            labels,
        } => ledger.replace_labels(transaction, labels).await,
    }
}

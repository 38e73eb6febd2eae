//! Deciding, for each additional-card transaction, what has to change in the ledger.

mod matching;

use std::fmt;

use crate::{LabelId, Transaction, TransactionId};
pub use matching::{MatchingKey, PrimaryIndex, normalize_merchant};

/// The label that marks additional-card transactions as processed.
#[derive(Debug, Clone)]
pub struct SyncLabel {
    pub id: LabelId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A matching primary transaction was already shared; only the label is added.
    ExistingShared,
    /// No matching primary transaction was shared yet; all of them become shared.
    NewShared,
    /// Nothing on the primary card matches.
    NoMatch,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::ExistingShared => "EXISTING SHARED",
            Outcome::NewShared => "NEW SHARED",
            Outcome::NoMatch => "NO MATCH",
        })
    }
}

/// A single remote change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetOwnershipShared(TransactionId),
    ReplaceLabels {
        transaction: TransactionId,
        labels: Vec<LabelId>,
    },
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::SetOwnershipShared(transaction) => {
                write!(f, "set owner=SHARED on {transaction}")
            }
            Mutation::ReplaceLabels {
                transaction,
                labels,
            } => {
                let labels: Vec<_> = labels.iter().map(|id| id.0.as_str()).collect();
                write!(f, "set labels of {transaction} to [{}]", labels.join(", "))
            }
        }
    }
}

/// What to do about one additional-card transaction.
///
/// Mutations are ordered: ownership changes always come before the label
/// change, so an interrupted run leaves the primary side shared and the next
/// run completes the labelling through [`Outcome::ExistingShared`].
#[derive(Debug)]
pub struct Decision<'a> {
    pub transaction: &'a Transaction,
    pub outcome: Outcome,
    pub mutations: Vec<Mutation>,
}

impl fmt::Display for Decision<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let transaction = self.transaction;
        write!(
            f,
            "[{}] {} ${} merch='{}' desc='{}'",
            self.outcome,
            transaction.date,
            transaction.amount,
            transaction.merchant,
            transaction.description
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub existing_shared: usize,
    pub new_shared: usize,
    pub no_match: usize,
}

impl Summary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::ExistingShared => self.existing_shared += 1,
            Outcome::NewShared => self.new_shared += 1,
            Outcome::NoMatch => self.no_match += 1,
        }
    }

    pub fn synced(&self) -> usize {
        self.existing_shared + self.new_shared
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Existing SHARED matches synced: {}",
            self.existing_shared
        )?;
        writeln!(f, "New SHARED set & synced:        {}", self.new_shared)?;
        write!(f, "No match in primary card:       {}", self.no_match)
    }
}

#[derive(Debug)]
pub struct Reconciliation<'a> {
    pub decisions: Vec<Decision<'a>>,
    pub summary: Summary,
}

impl Reconciliation<'_> {
    pub fn mutations(&self) -> impl Iterator<Item = &Mutation> {
        self.decisions
            .iter()
            .flat_map(|decision| &decision.mutations)
    }
}

/// Decide what has to change for every additional-card transaction that does
/// not carry the sync label yet.
///
/// Already labelled transactions count as processed and are left out entirely,
/// which makes repeated runs idempotent.
pub fn reconcile<'a>(
    primary: &'a [Transaction],
    additional: &'a [Transaction],
    label: &SyncLabel,
) -> Reconciliation<'a> {
    let index = PrimaryIndex::build(primary);

    let mut summary = Summary::default();
    let decisions: Vec<_> = additional
        .iter()
        .filter(|transaction| !transaction.has_label_named(&label.name))
        .map(|candidate| {
            let matches = index.matches(&MatchingKey::of(candidate));
            let decision = decide(candidate, matches, label);
            summary.record(decision.outcome);
            decision
        })
        .collect();

    Reconciliation { decisions, summary }
}

fn decide<'a>(
    candidate: &'a Transaction,
    matches: &[&Transaction],
    label: &SyncLabel,
) -> Decision<'a> {
    if matches.is_empty() {
        return Decision {
            transaction: candidate,
            outcome: Outcome::NoMatch,
            mutations: Vec::new(),
        };
    }

    // A shared match means someone already settled ownership on the primary
    // side, possibly by hand. Siblings that are still individual stay that way.
    let (outcome, mut mutations) = if matches.iter().any(|primary| primary.is_shared()) {
        (Outcome::ExistingShared, Vec::new())
    } else {
        let mutations = matches
            .iter()
            .map(|primary| Mutation::SetOwnershipShared(primary.id.clone()))
            .collect();
        (Outcome::NewShared, mutations)
    };
    mutations.extend(add_label(candidate, &label.id));

    Decision {
        transaction: candidate,
        outcome,
        mutations,
    }
}

/// Replace the label set with the existing labels plus `label`, unless it is already there.
fn add_label(transaction: &Transaction, label: &LabelId) -> Option<Mutation> {
    let mut labels: Vec<LabelId> = transaction.label_ids().cloned().collect();
    if labels.contains(label) {
        return None;
    }
    labels.push(label.clone());

    Some(Mutation::ReplaceLabels {
        transaction: transaction.id.clone(),
        labels,
    })
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Date, Decimal};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        TransactionId(id.to_owned())
    }
}

impl From<&str> for LabelId {
    fn from(id: &str) -> Self {
        LabelId(id.to_owned())
    }
}

/// A label (Monarch calls them tags), scoped to the household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
}

impl Label {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Label {
            id: LabelId(id.into()),
            name: name.into(),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ownership {
    /// Jointly attributed, no owning user.
    Shared,
    /// Attributed to a single user of the household.
    Individual,
}

impl Ownership {
    /// A missing owning user means the transaction is shared.
    pub fn from_owner<T>(owner: Option<T>) -> Self {
        match owner {
            None => Ownership::Shared,
            Some(_) => Ownership::Individual,
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Shared => f.write_str("SHARED"),
            Ownership::Individual => f.write_str("INDIVIDUAL"),
        }
    }
}

/// Snapshot of a ledger transaction at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: Date,
    pub amount: Decimal,
    /// Merchant name as shown by the ledger, empty when there is none.
    pub merchant: String,
    pub description: String,
    pub ownership: Ownership,
    pub labels: Vec<Label>,
}

impl Transaction {
    pub fn new(id: &str, date: Date, amount: Decimal, merchant: &str) -> Self {
        Transaction {
            id: TransactionId::from(id),
            date,
            amount,
            merchant: merchant.to_owned(),
            description: String::new(),
            ownership: Ownership::Individual,
            labels: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn is_shared(&self) -> bool {
        self.ownership == Ownership::Shared
    }

    pub fn has_label_named(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.is_named(name))
    }

    pub fn label_ids(&self) -> impl Iterator<Item = &LabelId> {
        self.labels.iter().map(|label| &label.id)
    }
}

/// One page of an account's transactions, plus the total the ledger reports for the whole listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn missing_owner_is_shared() {
        assert_eq!(Ownership::from_owner(None::<&str>), Ownership::Shared);
        assert_eq!(Ownership::from_owner(Some("user-1")), Ownership::Individual);
    }

    #[test]
    fn label_names_compare_case_insensitively() {
        let transaction = Transaction::new("t1", date("2025-01-01"), Decimal::from(-10), "Shop")
            .with_label(Label::new("l1", "Synced"));

        assert!(transaction.has_label_named("synced"));
        assert!(transaction.has_label_named("SYNCED"));
        assert!(!transaction.has_label_named("sync"));
    }

    #[test]
    fn label_ids_keep_order() {
        let transaction = Transaction::new("t1", date("2025-01-01"), Decimal::from(-10), "Shop")
            .with_label(Label::new("b", "Travel"))
            .with_label(Label::new("a", "Work"));

        let ids: Vec<_> = transaction.label_ids().map(|id| id.0.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }
}

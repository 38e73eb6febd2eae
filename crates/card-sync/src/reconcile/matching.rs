use std::collections::HashMap;

use crate::{Date, Decimal, Transaction};

/// Two transactions with the same key are taken to be the same purchase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchingKey {
    date: Date,
    amount: Decimal,
    merchant: String,
}

impl MatchingKey {
    pub fn of(transaction: &Transaction) -> Self {
        MatchingKey {
            date: transaction.date,
            // 12.5 and 12.50 are the same amount
            amount: transaction.amount.normalize(),
            merchant: normalize_merchant(&transaction.merchant),
        }
    }
}

pub fn normalize_merchant(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Primary-card transactions grouped by matching key, in fetch order within a key.
pub struct PrimaryIndex<'a> {
    buckets: HashMap<MatchingKey, Vec<&'a Transaction>>,
}

impl<'a> PrimaryIndex<'a> {
    pub fn build(primary: &'a [Transaction]) -> Self {
        let mut buckets: HashMap<_, Vec<_>> = HashMap::new();
        for transaction in primary {
            buckets
                .entry(MatchingKey::of(transaction))
                .or_default()
                .push(transaction);
        }
        PrimaryIndex { buckets }
    }

    pub fn matches(&self, key: &MatchingKey) -> &[&'a Transaction] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

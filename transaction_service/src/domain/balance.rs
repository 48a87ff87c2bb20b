//! Ledger reduction and cache-delta rules.
//!
//! Reimplements `examples/original_source/internal/app/services/transactions/running_balance.go`
//! and the `computeNewBalanceAfterTransactionStatusUpdate` delta logic,
//! resolving the ambiguity noted there the way spec.md 9 directs: pending
//! credits never contribute to the balance, so a credit's `pending->failed`
//! transition is a cache no-op.

use common::types::{TransactionStatus, TransactionType};

use crate::domain::entities::Transaction;

/// Whether a transaction in `status` currently contributes to its wallet's
/// balance, given its `transaction_type`.
pub fn contributes(transaction_type: TransactionType, status: TransactionStatus) -> bool {
    match transaction_type {
        TransactionType::Credit => matches!(status, TransactionStatus::Completed),
        TransactionType::Debit => {
            matches!(status, TransactionStatus::Pending | TransactionStatus::Completed)
        }
    }
}

/// Reduces a wallet's full ledger to its balance (spec.md 3): completed
/// credits add, pending-or-completed debits subtract, failed transactions
/// of either type are ignored.
pub fn reduce(ledger: &[Transaction]) -> i64 {
    ledger.iter().fold(0i64, |balance, t| {
        if !contributes(t.transaction_type, t.status) {
            return balance;
        }

        match t.transaction_type {
            TransactionType::Credit => balance + t.amount,
            TransactionType::Debit => balance - t.amount,
        }
    })
}

/// Signed adjustment to apply to a cached balance when a transaction of
/// `transaction_type` and `amount` moves from `from` to `to` (spec.md 4.2.4).
/// `from == to` never happens in practice (callers short-circuit no-op
/// updates before taking a lock) but is defined as zero for completeness.
pub fn delta_for_transition(
    transaction_type: TransactionType,
    amount: i64,
    from: TransactionStatus,
    to: TransactionStatus,
) -> i64 {
    if from == to {
        return 0;
    }

    let was = contributes(transaction_type, from);
    let is = contributes(transaction_type, to);

    match (was, is) {
        (false, true) => match transaction_type {
            TransactionType::Credit => amount,
            TransactionType::Debit => -amount,
        },
        (true, false) => match transaction_type {
            TransactionType::Credit => -amount,
            TransactionType::Debit => amount,
        },
        _ => 0,
    }
}

/// Delta to apply when a brand-new transaction is created in `pending`
/// (spec.md 4.2.4: "Create credit as pending" is a no-op, "Create debit as
/// pending" reserves the amount).
pub fn delta_for_create(transaction_type: TransactionType, amount: i64) -> i64 {
    match transaction_type {
        TransactionType::Credit => 0,
        TransactionType::Debit => -amount,
    }
}

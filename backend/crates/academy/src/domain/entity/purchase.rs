//! Course Purchase Entity
//!
//! `pending -> completed | failed`; both outcomes are terminal.

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, PurchaseId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_object::payment_reference::PaymentReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum PurchaseStatus {
    Pending = 0,
    Completed = 1,
    Failed = 2,
}

impl PurchaseStatus {
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(PurchaseStatus::Pending),
            1 => Some(PurchaseStatus::Completed),
            2 => Some(PurchaseStatus::Failed),
            _ => None,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        !matches!(self, PurchaseStatus::Pending)
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone)]
pub struct CoursePurchase {
    pub purchase_id: PurchaseId,
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Minor currency units, copied from the course price at checkout
    pub amount: i64,
    pub currency: String,
    pub status: PurchaseStatus,
    pub reference: PaymentReference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CoursePurchase {
    pub fn pending(user_id: UserId, course_id: CourseId, amount: i64, currency: &str) -> Self {
        let now = Utc::now();

        Self {
            purchase_id: PurchaseId::new(),
            user_id,
            course_id,
            amount,
            currency: currency.to_string(),
            status: PurchaseStatus::Pending,
            reference: PaymentReference::generate(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move a pending purchase to a terminal state; false if already settled
    pub fn settle(&mut self, outcome: PurchaseStatus) -> bool {
        if self.status.is_terminal() || !outcome.is_terminal() {
            return false;
        }
        self.status = outcome;
        self.updated_at = Utc::now();
        true
    }
}

/// Result of applying a gateway confirmation
#[derive(Debug, Clone)]
pub enum SettleOutcome {
    /// This call moved the purchase out of `pending`
    Settled(CoursePurchase),
    /// Already completed earlier; nothing re-applied
    AlreadyCompleted(CoursePurchase),
    /// The pair already had a completed purchase; this one was failed instead
    Duplicate(CoursePurchase),
    /// No pending purchase carries the reference
    NotPending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_once() {
        let mut purchase = CoursePurchase::pending(UserId::new(), CourseId::new(), 999, "INR");
        assert_eq!(purchase.status, PurchaseStatus::Pending);
        assert!(!purchase.settle(PurchaseStatus::Pending));
        assert!(purchase.settle(PurchaseStatus::Completed));
        assert!(!purchase.settle(PurchaseStatus::Failed));
        assert_eq!(purchase.status, PurchaseStatus::Completed);
    }

    #[test]
    fn test_status_ids() {
        for status in [
            PurchaseStatus::Pending,
            PurchaseStatus::Completed,
            PurchaseStatus::Failed,
        ] {
            assert_eq!(PurchaseStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(PurchaseStatus::from_id(9), None);
        assert_eq!(
            serde_json::to_string(&PurchaseStatus::Failed).unwrap(),
            "\"failed\""
        );
    }
}

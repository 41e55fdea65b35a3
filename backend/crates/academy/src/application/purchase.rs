//! Purchase Use Cases
//!
//! `pending -> completed | failed`. Checkout creates the pending purchase;
//! the payment gateway settles it by calling the webhook.

use std::sync::Arc;

use auth::CurrentUser;
use kernel::id::{CourseId, UserId};

use crate::application::config::AcademyConfig;
use crate::application::course::{CourseDetail, load_course, load_detail};
use crate::domain::entity::{
    course::Course,
    purchase::{CoursePurchase, PurchaseStatus, SettleOutcome},
};
use crate::domain::repository::AcademyStore;
use crate::domain::value_object::payment_reference::PaymentReference;
use crate::error::{AcademyError, AcademyResult};

/// What the client hands to the payment gateway
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    pub reference: PaymentReference,
    pub amount: i64,
    pub currency: String,
    pub course_title: String,
}

#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub purchase: CoursePurchase,
    /// The purchase was already completed before this call
    pub replayed: bool,
    /// The buyer already owned the course, so this purchase was failed
    pub duplicate: bool,
}

#[derive(Debug, Clone)]
pub struct PurchasedCourse {
    pub purchase: CoursePurchase,
    pub course: Course,
}

pub struct PurchaseUseCase<R>
where
    R: AcademyStore,
{
    store: Arc<R>,
    config: Arc<AcademyConfig>,
}

impl<R> PurchaseUseCase<R>
where
    R: AcademyStore,
{
    pub fn new(store: Arc<R>, config: Arc<AcademyConfig>) -> Self {
        Self { store, config }
    }

    pub async fn checkout(
        &self,
        current: &CurrentUser,
        course_id: &CourseId,
    ) -> AcademyResult<CheckoutOrder> {
        let course = load_course(self.store.as_ref(), course_id).await?;

        if course.is_creator(&current.user_id) {
            return Err(AcademyError::OwnCourse);
        }

        if self
            .store
            .find_completed_purchase(&current.user_id, course_id)
            .await?
            .is_some()
        {
            return Err(AcademyError::AlreadyPurchased);
        }

        let purchase = CoursePurchase::pending(
            current.user_id,
            course.course_id,
            course.price,
            &self.config.currency,
        );
        let replaced = self.store.replace_pending_purchase(&purchase).await?;

        tracing::info!(
            user_id = %current.user_id,
            course_id = %course_id,
            reference = %purchase.reference,
            amount = purchase.amount,
            replaced_pending = replaced,
            "Checkout started"
        );

        Ok(CheckoutOrder {
            reference: purchase.reference,
            amount: purchase.amount,
            currency: purchase.currency,
            course_title: course.title,
        })
    }

    /// Checks `base64(HMAC-SHA256(secret, body))`.
    ///
    /// Without a configured secret every body is accepted.
    pub fn verify_webhook(&self, body: &[u8], signature: Option<&str>) -> AcademyResult<()> {
        let Some(secret) = self.config.webhook_secret.as_ref() else {
            return Ok(());
        };

        let tag = signature
            .and_then(|s| platform::crypto::from_base64(s.trim()).ok())
            .ok_or(AcademyError::InvalidWebhookSignature)?;

        if platform::crypto::verify_hmac_sha256(secret, body, &tag) {
            Ok(())
        } else {
            Err(AcademyError::InvalidWebhookSignature)
        }
    }

    /// Settle a pending purchase. Completing enrolls the buyer and opens
    /// every lecture of the course in the same transaction.
    pub async fn confirm(
        &self,
        reference: &str,
        outcome: PurchaseStatus,
    ) -> AcademyResult<ConfirmOutcome> {
        if !outcome.is_terminal() {
            return Err(AcademyError::Validation(
                "Status must be completed or failed".into(),
            ));
        }

        let reference = PaymentReference::parse(reference).ok_or(AcademyError::PurchaseNotFound)?;

        match self.store.settle_purchase(&reference, outcome).await? {
            SettleOutcome::Settled(purchase) => {
                tracing::info!(
                    reference = %reference,
                    user_id = %purchase.user_id,
                    course_id = %purchase.course_id,
                    status = %purchase.status,
                    "Purchase settled"
                );
                Ok(ConfirmOutcome {
                    purchase,
                    replayed: false,
                    duplicate: false,
                })
            }
            SettleOutcome::AlreadyCompleted(purchase) => {
                tracing::info!(reference = %reference, "Purchase confirmation replayed");
                Ok(ConfirmOutcome {
                    purchase,
                    replayed: true,
                    duplicate: false,
                })
            }
            SettleOutcome::Duplicate(purchase) => {
                tracing::warn!(
                    reference = %reference,
                    user_id = %purchase.user_id,
                    course_id = %purchase.course_id,
                    "Course already purchased; duplicate payment marked failed"
                );
                Ok(ConfirmOutcome {
                    purchase,
                    replayed: false,
                    duplicate: true,
                })
            }
            SettleOutcome::NotPending => Err(AcademyError::PurchaseNotFound),
        }
    }

    pub async fn status(&self, reference: &str) -> AcademyResult<CoursePurchase> {
        let reference = PaymentReference::parse(reference).ok_or(AcademyError::PurchaseNotFound)?;

        self.store
            .find_purchase_by_reference(&reference)
            .await?
            .ok_or(AcademyError::PurchaseNotFound)
    }

    pub async fn detail_with_status(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<(CourseDetail, bool)> {
        let detail = load_detail(self.store.as_ref(), course_id).await?;
        let purchased = self
            .store
            .find_completed_purchase(user_id, course_id)
            .await?
            .is_some();

        Ok((detail, purchased))
    }

    pub async fn list_purchased(&self, user_id: &UserId) -> AcademyResult<Vec<PurchasedCourse>> {
        let purchases = self.store.list_completed_purchases(user_id).await?;

        let mut purchased = Vec::with_capacity(purchases.len());
        for purchase in purchases {
            // Course deletion cascades purchases, so a miss is a concurrent delete.
            if let Some(course) = self.store.find_course(&purchase.course_id).await? {
                purchased.push(PurchasedCourse { purchase, course });
            }
        }
        Ok(purchased)
    }
}

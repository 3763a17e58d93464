//! Optimistic mutation coordinator
//!
//! Applies a local change to the shared record before the remote call
//! resolves, and restores the exact pre-mutation snapshot when the call
//! fails. The owner's cached history is invalidated BEFORE the remote
//! call is issued: a fetch racing the mutation must never re-validate a
//! page that predates it. That invalidation is not undone on failure;
//! it only forces a refetch and cannot corrupt remote state.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use shared::models::{FinalStatus, HistoryEntry, PaymentRecord};

use crate::api::PaymentApi;
use crate::cache::{now_millis, owner_prefix, HistoryCache};
use crate::error::ClientResult;
use crate::scope::validate_exoneration;

/// Outcome of an optimistic mutation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Remote call succeeded; local state is authoritative
    Applied,
    /// Target is logically deleted; nothing was changed or sent
    Ignored,
    /// A mutation for this target is still in flight
    Busy,
}

/// Coordinates optimistic mutations for one payment record
///
/// The in-flight guard is keyed by target id, so slow calls for one
/// record never block actions on unrelated targets.
pub struct MutationCoordinator {
    api: Arc<dyn PaymentApi>,
    cache: HistoryCache,
    record: Arc<RwLock<PaymentRecord>>,
    in_flight: Mutex<HashSet<String>>,
}

impl MutationCoordinator {
    pub fn new(api: Arc<dyn PaymentApi>, cache: HistoryCache, record: PaymentRecord) -> Self {
        Self {
            api,
            cache,
            record: Arc::new(RwLock::new(record)),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Current copy of the record
    pub async fn snapshot(&self) -> PaymentRecord {
        self.record.read().await.clone()
    }

    /// Replace the local record, typically after a parent refetch
    pub async fn replace_record(&self, record: PaymentRecord) {
        *self.record.write().await = record;
    }

    async fn id(&self) -> String {
        self.record.read().await.id.clone()
    }

    /// Run one optimistic mutation.
    ///
    /// Sequence: deleted guard -> snapshot -> local `update` -> owner
    /// prefix invalidation -> `remote`. Success keeps the optimistic
    /// state, replaced wholesale by the server's echoed record when one
    /// is present. Failure restores the snapshot exactly (full replace,
    /// not a merge) and propagates the error once.
    pub async fn apply<U, R, Fut>(
        &self,
        action: &str,
        update: U,
        remote: R,
    ) -> ClientResult<MutationOutcome>
    where
        U: FnOnce(&mut PaymentRecord),
        R: FnOnce(Arc<dyn PaymentApi>) -> Fut,
        Fut: Future<Output = ClientResult<Option<PaymentRecord>>>,
    {
        let (id, snapshot) = {
            let record = self.record.read().await;
            if record.is_deleted() {
                tracing::debug!(payment_id = %record.id, action, "mutation ignored for deleted record");
                return Ok(MutationOutcome::Ignored);
            }
            (record.id.clone(), record.clone())
        };

        if !self.try_acquire(&id).await {
            tracing::debug!(payment_id = %id, action, "mutation refused; another is in flight");
            return Ok(MutationOutcome::Busy);
        }

        {
            let mut record = self.record.write().await;
            update(&mut record);
        }

        self.cache.invalidate_prefix(&owner_prefix(&id)).await;

        let result = remote(Arc::clone(&self.api)).await;
        self.release(&id).await;

        match result {
            Ok(echo) => {
                if let Some(server_record) = echo {
                    *self.record.write().await = server_record;
                }
                tracing::debug!(payment_id = %id, action, "mutation applied");
                Ok(MutationOutcome::Applied)
            }
            Err(err) => {
                *self.record.write().await = snapshot;
                tracing::warn!(payment_id = %id, action, error = %err, "mutation rolled back");
                Err(err)
            }
        }
    }

    async fn try_acquire(&self, key: &str) -> bool {
        self.in_flight.lock().await.insert(key.to_string())
    }

    async fn release(&self, key: &str) {
        self.in_flight.lock().await.remove(key);
    }

    // ========================================================================
    // Named console actions
    // ========================================================================

    /// Suspend or reactivate the family account
    pub async fn set_suspended(&self, suspended: bool) -> ClientResult<MutationOutcome> {
        let id = self.id().await;
        self.apply(
            if suspended { "suspend" } else { "activate" },
            move |record| {
                record.final_status = if suspended {
                    FinalStatus::Inactivo
                } else {
                    FinalStatus::Pendiente
                };
            },
            move |api| async move { api.set_user_state(&id, suspended).await.map(Some) },
        )
        .await
    }

    /// Freeze or resume penalty accrual
    pub async fn set_penalty_frozen(&self, frozen: bool) -> ClientResult<MutationOutcome> {
        let id = self.id().await;
        let stamp = frozen.then(now_millis);
        self.apply(
            if frozen { "freeze_penalty" } else { "unfreeze_penalty" },
            move |record| record.penalty_frozen_at = stamp,
            move |api| async move { api.set_penalty_frozen(&id, frozen).await.map(Some) },
        )
        .await
    }

    /// Waive part of the accumulated penalty; the amount must be positive
    pub async fn exonerate_penalty(&self, amount: f64) -> ClientResult<MutationOutcome> {
        let amount = validate_exoneration(amount)?;
        let id = self.id().await;
        self.apply(
            "exonerate_penalty",
            move |record| {
                record.accumulated_penalty = (record.accumulated_penalty - amount).max(0.0);
            },
            move |api| async move { api.exonerate_penalty(&id, amount).await.map(Some) },
        )
        .await
    }

    pub async fn update_receipt_number(
        &self,
        receipt_number: impl Into<String>,
    ) -> ClientResult<MutationOutcome> {
        let receipt = receipt_number.into();
        let optimistic = receipt.clone();
        let id = self.id().await;
        self.apply(
            "update_receipt_number",
            move |record| record.receipt_number = Some(optimistic),
            move |api| async move { api.update_receipt_number(&id, &receipt).await.map(Some) },
        )
        .await
    }

    pub async fn update_notes(&self, notes: impl Into<String>) -> ClientResult<MutationOutcome> {
        let notes = notes.into();
        let optimistic = notes.clone();
        let id = self.id().await;
        self.apply(
            "update_notes",
            move |record| record.notes = Some(optimistic),
            move |api| async move { api.update_notes(&id, &notes).await.map(Some) },
        )
        .await
    }

    /// Full payment reversal; the record becomes logically deleted
    pub async fn reverse_payment(&self) -> ClientResult<MutationOutcome> {
        let id = self.id().await;
        self.apply(
            "reverse_payment",
            |record| record.final_status = FinalStatus::Eliminado,
            move |api| async move { api.reverse_payment(&id).await.map(|_| None) },
        )
        .await
    }

    /// Flip a history row's invoice flag.
    ///
    /// The row lives in the caller's table state rather than the record,
    /// so rollback is a plain flip-back; the record snapshot protocol
    /// does not apply. Guarded by entry id.
    pub async fn set_invoice_sent(
        &self,
        entry: &mut HistoryEntry,
        sent: bool,
    ) -> ClientResult<MutationOutcome> {
        let owner = {
            let record = self.record.read().await;
            if record.is_deleted() {
                tracing::debug!(entry_id = %entry.id, "invoice toggle ignored for deleted record");
                return Ok(MutationOutcome::Ignored);
            }
            record.id.clone()
        };

        if !self.try_acquire(&entry.id).await {
            return Ok(MutationOutcome::Busy);
        }

        let previous = entry.invoice_sent;
        entry.invoice_sent = sent;
        self.cache.invalidate_prefix(&owner_prefix(&owner)).await;

        let result = self.api.set_invoice_sent(&entry.id, sent).await;
        self.release(&entry.id).await;

        match result {
            Ok(server_entry) => {
                *entry = server_entry;
                Ok(MutationOutcome::Applied)
            }
            Err(err) => {
                entry.invoice_sent = previous;
                tracing::warn!(entry_id = %entry.id, error = %err, "invoice flag rolled back");
                Err(err)
            }
        }
    }
}

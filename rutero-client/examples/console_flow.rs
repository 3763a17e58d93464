//! Walkthrough of the console core against an in-memory payment service.
//!
//! Run with: cargo run -p rutero-client --example console_flow

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rutero_client::{
    current_period, total_due, ClientError, ClientResult, FinalStatus, HistoryCache, HistoryEntry,
    HistoryPage, LedgerStore, MutationCoordinator, PaymentApi, PaymentRecord, RetroMode,
    RetroOption, RetroactiveFlow, UnpaidPeriod,
};
use shared::models::{EntryKind, EntrySource};
use shared::request::{ApplyDiscountRequest, ApplyRouteTypeRequest};
use shared::response::AdjustmentSummary;

/// Minimal in-memory stand-in for the remote payment service.
struct InMemoryService {
    record: Mutex<PaymentRecord>,
    unpaid: Vec<UnpaidPeriod>,
    history: Vec<HistoryEntry>,
}

#[async_trait]
impl PaymentApi for InMemoryService {
    async fn fetch_history(
        &self,
        _payment_id: &str,
        _page: u32,
        _limit: u32,
    ) -> ClientResult<HistoryPage> {
        Ok(HistoryPage {
            entries: self.history.clone(),
            total: self.history.len() as u64,
        })
    }

    async fn fetch_record(&self, _payment_id: &str) -> ClientResult<PaymentRecord> {
        Ok(self.record.lock().await.clone())
    }

    async fn fetch_unpaid_periods(&self, _payment_id: &str) -> ClientResult<Vec<UnpaidPeriod>> {
        Ok(self.unpaid.clone())
    }

    async fn recalc(&self, _payment_id: &str) -> ClientResult<()> {
        Ok(())
    }

    async fn set_invoice_sent(&self, entry_id: &str, _sent: bool) -> ClientResult<HistoryEntry> {
        Err(ClientError::NotFound(entry_id.to_string()))
    }

    async fn apply_family_discount(
        &self,
        _payment_id: &str,
        req: ApplyDiscountRequest,
    ) -> ClientResult<AdjustmentSummary> {
        let mut record = self.record.lock().await;
        record.family_special_fee = req.special_fee;
        Ok(AdjustmentSummary {
            affected_periods: self.unpaid.len() as u32,
            record: Some(record.clone()),
        })
    }

    async fn apply_family_route_type(
        &self,
        _payment_id: &str,
        _req: ApplyRouteTypeRequest,
    ) -> ClientResult<AdjustmentSummary> {
        Ok(AdjustmentSummary {
            affected_periods: 0,
            record: None,
        })
    }

    async fn set_user_state(
        &self,
        _payment_id: &str,
        suspended: bool,
    ) -> ClientResult<PaymentRecord> {
        let mut record = self.record.lock().await;
        record.final_status = if suspended {
            FinalStatus::Inactivo
        } else {
            FinalStatus::Pendiente
        };
        Ok(record.clone())
    }

    async fn set_penalty_frozen(
        &self,
        _payment_id: &str,
        _frozen: bool,
    ) -> ClientResult<PaymentRecord> {
        Ok(self.record.lock().await.clone())
    }

    async fn exonerate_penalty(&self, _payment_id: &str, amount: f64) -> ClientResult<PaymentRecord> {
        let mut record = self.record.lock().await;
        record.accumulated_penalty = (record.accumulated_penalty - amount).max(0.0);
        Ok(record.clone())
    }

    async fn update_receipt_number(
        &self,
        _payment_id: &str,
        receipt_number: &str,
    ) -> ClientResult<PaymentRecord> {
        let mut record = self.record.lock().await;
        record.receipt_number = Some(receipt_number.to_string());
        Ok(record.clone())
    }

    async fn update_notes(&self, _payment_id: &str, notes: &str) -> ClientResult<PaymentRecord> {
        let mut record = self.record.lock().await;
        record.notes = Some(notes.to_string());
        Ok(record.clone())
    }

    async fn reverse_payment(&self, _payment_id: &str) -> ClientResult<()> {
        self.record.lock().await.final_status = FinalStatus::Eliminado;
        Ok(())
    }
}

fn sample_record() -> PaymentRecord {
    PaymentRecord {
        id: "pay-42".to_string(),
        school_id: "sch-7".to_string(),
        user_id: "usr-9".to_string(),
        tariff: 500.0,
        outstanding: None,
        accumulated_penalty: 50.0,
        credit_balance: 20.0,
        family_special_fee: 30.0,
        final_status: FinalStatus::Mora,
        penalty_frozen_at: None,
        route_type: Some("COMPLETA".to_string()),
        notes: None,
        receipt_number: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let service = Arc::new(InMemoryService {
        record: Mutex::new(sample_record()),
        unpaid: vec![
            UnpaidPeriod {
                period: "2025-01".parse()?,
                original_amount: 500.0,
                net_amount: 470.0,
                is_overdue: true,
            },
            UnpaidPeriod {
                period: "2025-02".parse()?,
                original_amount: 500.0,
                net_amount: 470.0,
                is_overdue: false,
            },
        ],
        history: vec![HistoryEntry {
            id: "t-1".to_string(),
            payment_id: "pay-42".to_string(),
            real_payment_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 8)
                .ok_or_else(|| anyhow::anyhow!("bad date"))?,
            amount: 500.0,
            kind: EntryKind::Tarifa,
            source: EntrySource::AutoDebit,
            receipt_number: Some("R-1001".to_string()),
            invoice_sent: true,
            notes: None,
            extraordinary_discount: None,
        }],
    });

    let cache = HistoryCache::default();
    let store = LedgerStore::new(service.clone(), cache.clone());
    let coordinator = MutationCoordinator::new(service.clone(), cache.clone(), sample_record());

    // Summary as shown in the payment dialog
    let record = coordinator.snapshot().await;
    println!("total due (extra discount 10): {}", total_due(&record, 10.0));

    // First read hits the service, second one the cache
    let page = store.page("pay-42", 0, 20).await?;
    println!("history page: {} of {} entries", page.entries.len(), page.total);
    store.page("pay-42", 0, 20).await?;

    // Optimistic suspend, reconciled with the service echo
    coordinator.set_suspended(true).await?;
    println!("status after suspend: {:?}", coordinator.snapshot().await.final_status);

    // Retroactive discount over every pending period
    let flow = RetroactiveFlow::new(service.clone(), cache);
    flow.open(RetroMode::Discount, "pay-42").await?;
    flow.choose_option(RetroOption::CurrentOrPending).await;
    flow.set_select_all(true).await;
    flow.set_typed_fee(Some(25.0)).await;

    let summary = flow
        .submit(&current_period(), |s| {
            println!("applied to {} periods", s.affected_periods)
        })
        .await?;
    println!("service echoed record: {}", summary.record.is_some());

    Ok(())
}

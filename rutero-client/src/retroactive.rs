//! Retroactive-apply workflow
//!
//! Dialog-level flow for applying a family discount or route-type change
//! across billing periods:
//!
//! `Idle -> LoadingContext -> OptionSelected -> Submitting -> Applied | Failed`
//!
//! No stage is terminal; the flow fully resets on every `open`. A failed
//! submission keeps the dialog open and allows resubmission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use shared::models::{PaymentRecord, UnpaidPeriod};
use shared::request::{ApplyDiscountRequest, ApplyRouteTypeRequest};
use shared::response::AdjustmentSummary;
use shared::types::Period;

use crate::api::PaymentApi;
use crate::cache::{owner_prefix, HistoryCache};
use crate::error::{ClientError, ClientResult};
use crate::scope::{
    resolve_discount, resolve_route_type, resolve_scope, RetroOption, ValidationError,
};

/// What the dialog is applying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetroMode {
    #[default]
    Discount,
    RouteType,
}

/// Workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetroStage {
    #[default]
    Idle,
    LoadingContext,
    OptionSelected,
    Submitting,
    Applied,
    Failed,
}

/// Message severity for dialog notices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Error,
}

/// Severity-tagged dialog message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn warn(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Billing period containing today's date
pub fn current_period() -> Period {
    Period::from(chrono::Local::now().date_naive())
}

#[derive(Debug, Default)]
struct FlowState {
    mode: RetroMode,
    stage: RetroStage,
    payment_id: Option<String>,
    record: Option<PaymentRecord>,
    unpaid_periods: Vec<UnpaidPeriod>,
    option: Option<RetroOption>,
    selected: Vec<Period>,
    select_all: bool,
    typed_fee: Option<f64>,
    route_type: Option<String>,
    notice: Option<Notice>,
}

enum Payload {
    Discount(ApplyDiscountRequest),
    RouteType(ApplyRouteTypeRequest),
}

/// Reusable dialog flow for retroactive family adjustments
pub struct RetroactiveFlow {
    api: Arc<dyn PaymentApi>,
    cache: HistoryCache,
    state: RwLock<FlowState>,
    loading: AtomicBool,
}

impl RetroactiveFlow {
    pub fn new(api: Arc<dyn PaymentApi>, cache: HistoryCache) -> Self {
        Self {
            api,
            cache,
            state: RwLock::new(FlowState::default()),
            loading: AtomicBool::new(false),
        }
    }

    pub async fn stage(&self) -> RetroStage {
        self.state.read().await.stage
    }

    pub async fn mode(&self) -> RetroMode {
        self.state.read().await.mode
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    pub async fn record(&self) -> Option<PaymentRecord> {
        self.state.read().await.record.clone()
    }

    pub async fn unpaid_periods(&self) -> Vec<UnpaidPeriod> {
        self.state.read().await.unpaid_periods.clone()
    }

    /// Open the dialog for one family account.
    ///
    /// Resets all selection state, triggers a service-side recalc so the
    /// figures shown are current, and loads the context. A second open
    /// while one is still loading is refused. A failed context load
    /// degrades to empty collections instead of blocking the dialog.
    pub async fn open(&self, mode: RetroMode, payment_id: &str) -> ClientResult<()> {
        if self.loading.swap(true, Ordering::AcqRel) {
            tracing::debug!(payment_id, "open ignored; context load already in flight");
            return Ok(());
        }

        {
            let mut state = self.state.write().await;
            *state = FlowState::default();
            state.mode = mode;
            state.payment_id = Some(payment_id.to_string());
            state.stage = RetroStage::LoadingContext;
        }

        // Figures shown in the dialog should be current; a failed recalc
        // is not fatal, the service will catch up on its own.
        if let Err(err) = self.api.recalc(payment_id).await {
            tracing::warn!(payment_id, error = %err, "recalc before dialog failed");
        }

        let (periods, record) = tokio::join!(
            self.api.fetch_unpaid_periods(payment_id),
            self.api.fetch_record(payment_id),
        );

        {
            let mut state = self.state.write().await;
            match record {
                Ok(record) => state.record = Some(record),
                Err(err) => {
                    tracing::warn!(payment_id, error = %err, "record load failed; dialog degraded");
                    state.notice =
                        Some(Notice::warn("No se pudo cargar el registro de pago"));
                }
            }
            match periods {
                Ok(periods) => state.unpaid_periods = periods,
                Err(err) => {
                    tracing::warn!(payment_id, error = %err, "unpaid periods load failed; dialog degraded");
                    state.notice =
                        Some(Notice::warn("No se pudieron cargar los periodos pendientes"));
                }
            }
        }

        self.loading.store(false, Ordering::Release);
        Ok(())
    }

    pub async fn choose_option(&self, option: RetroOption) {
        let mut state = self.state.write().await;
        state.option = Some(option);
        state.stage = RetroStage::OptionSelected;
    }

    pub async fn toggle_period(&self, period: &Period) {
        let mut state = self.state.write().await;
        if let Some(idx) = state.selected.iter().position(|p| p == period) {
            state.selected.remove(idx);
        } else {
            state.selected.push(period.clone());
        }
    }

    pub async fn set_select_all(&self, select_all: bool) {
        self.state.write().await.select_all = select_all;
    }

    pub async fn set_typed_fee(&self, fee: Option<f64>) {
        self.state.write().await.typed_fee = fee;
    }

    pub async fn set_route_type(&self, route_type: Option<String>) {
        self.state.write().await.route_type = route_type;
    }

    /// Validate, resolve the scope and post the adjustment.
    ///
    /// Validation failures never reach the network and leave the stage
    /// where it was. On success the owner's cached history is dropped
    /// (before the request goes out, like every other mutation) and
    /// `on_applied` runs; on remote failure the stage moves to `Failed`
    /// with an error notice and the dialog stays open for resubmission.
    pub async fn submit<F>(
        &self,
        current_period: &Period,
        on_applied: F,
    ) -> ClientResult<AdjustmentSummary>
    where
        F: FnOnce(&AdjustmentSummary),
    {
        let (payment_id, payload) = {
            let mut state = self.state.write().await;
            let payment_id = state
                .payment_id
                .clone()
                .ok_or_else(|| ClientError::Internal("retroactive flow was never opened".into()))?;

            match build_payload(&state, current_period) {
                Ok(payload) => {
                    state.stage = RetroStage::Submitting;
                    state.notice = None;
                    (payment_id, payload)
                }
                Err(err) => {
                    state.notice = Some(Notice::warn(err.to_string()));
                    return Err(err.into());
                }
            }
        };

        self.cache.invalidate_prefix(&owner_prefix(&payment_id)).await;

        let result = match payload {
            Payload::Discount(req) => self.api.apply_family_discount(&payment_id, req).await,
            Payload::RouteType(req) => self.api.apply_family_route_type(&payment_id, req).await,
        };

        match result {
            Ok(summary) => {
                on_applied(&summary);
                let mut state = self.state.write().await;
                state.stage = RetroStage::Applied;
                tracing::debug!(
                    payment_id = %payment_id,
                    affected = summary.affected_periods,
                    "retroactive adjustment applied"
                );
                Ok(summary)
            }
            Err(err) => {
                let mut state = self.state.write().await;
                state.stage = RetroStage::Failed;
                state.notice =
                    Some(Notice::error(format!("No se pudo aplicar el ajuste: {}", err)));
                tracing::warn!(payment_id = %payment_id, error = %err, "retroactive adjustment failed");
                Err(err)
            }
        }
    }
}

/// Mode-specific validation first, then scope resolution; both fail closed.
fn build_payload(state: &FlowState, current_period: &Period) -> Result<Payload, ValidationError> {
    match state.mode {
        RetroMode::Discount => {
            let configured = state.record.as_ref().map(|r| r.family_special_fee);
            let special_fee = resolve_discount(state.typed_fee, configured)?;
            let scope = resolve_scope(
                state.option,
                &state.selected,
                state.select_all,
                current_period,
            )?;
            Ok(Payload::Discount(ApplyDiscountRequest { special_fee, scope }))
        }
        RetroMode::RouteType => {
            let route_type = resolve_route_type(state.route_type.as_deref())?;
            let scope = resolve_scope(
                state.option,
                &state.selected,
                state.select_all,
                current_period,
            )?;
            Ok(Payload::RouteType(ApplyRouteTypeRequest { route_type, scope }))
        }
    }
}

//! Payment service API
//!
//! `PaymentApi` is the seam the console core depends on; tests and the
//! desktop shell swap in their own implementations. `RestPaymentApi` is
//! the reqwest-backed implementation used against the real service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::models::{HistoryEntry, PaymentRecord, UnpaidPeriod};
use shared::request::{
    ApplyDiscountRequest, ApplyRouteTypeRequest, ExoneratePenaltyRequest, SetInvoiceSentRequest,
    SetPenaltyFrozenRequest, SetUserStateRequest, UpdateNotesRequest, UpdateReceiptRequest,
};
use shared::response::{AdjustmentSummary, ApiResponse, HistoryPage};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Remote payment service contract
///
/// The service is the ledger of record: it creates every id, accrues
/// every penalty and computes every discount. This trait only mirrors
/// and triggers that work.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    async fn fetch_history(&self, payment_id: &str, page: u32, limit: u32)
        -> ClientResult<HistoryPage>;
    async fn fetch_record(&self, payment_id: &str) -> ClientResult<PaymentRecord>;
    async fn fetch_unpaid_periods(&self, payment_id: &str) -> ClientResult<Vec<UnpaidPeriod>>;
    /// Fire-and-forget recomputation trigger issued before dialogs open
    async fn recalc(&self, payment_id: &str) -> ClientResult<()>;
    async fn set_invoice_sent(&self, entry_id: &str, sent: bool) -> ClientResult<HistoryEntry>;
    async fn apply_family_discount(
        &self,
        payment_id: &str,
        req: ApplyDiscountRequest,
    ) -> ClientResult<AdjustmentSummary>;
    async fn apply_family_route_type(
        &self,
        payment_id: &str,
        req: ApplyRouteTypeRequest,
    ) -> ClientResult<AdjustmentSummary>;
    async fn set_user_state(&self, payment_id: &str, suspended: bool)
        -> ClientResult<PaymentRecord>;
    async fn set_penalty_frozen(&self, payment_id: &str, frozen: bool)
        -> ClientResult<PaymentRecord>;
    async fn exonerate_penalty(&self, payment_id: &str, amount: f64)
        -> ClientResult<PaymentRecord>;
    async fn update_receipt_number(
        &self,
        payment_id: &str,
        receipt_number: &str,
    ) -> ClientResult<PaymentRecord>;
    async fn update_notes(&self, payment_id: &str, notes: &str) -> ClientResult<PaymentRecord>;
    /// Full payment reversal; the record becomes logically deleted
    async fn reverse_payment(&self, payment_id: &str) -> ClientResult<()>;
}

/// REST implementation of [`PaymentApi`]
#[derive(Debug, Clone)]
pub struct RestPaymentApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RestPaymentApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, &url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Decode the service envelope, mapping failures onto `ClientError`
    async fn handle<T: DeserializeOwned>(&self, response: reqwest::Response) -> ClientResult<T> {
        let envelope = self.decode(response).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("missing response data".into()))
    }

    /// Variant for endpoints whose success payload is empty
    async fn handle_empty(&self, response: reqwest::Response) -> ClientResult<()> {
        let _: ApiResponse<serde_json::Value> = self.decode(response).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<ApiResponse<T>> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            // Error bodies normally still carry the envelope
            if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
                return Err(ClientError::Api {
                    code: envelope.code,
                    message: envelope.message,
                });
            }
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                _ => Err(ClientError::Api {
                    code: status.as_u16().to_string(),
                    message: text,
                }),
            };
        }
        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.is_success() {
            return Err(ClientError::Api {
                code: envelope.code,
                message: envelope.message,
            });
        }
        Ok(envelope)
    }
}

#[async_trait]
impl PaymentApi for RestPaymentApi {
    async fn fetch_history(
        &self,
        payment_id: &str,
        page: u32,
        limit: u32,
    ) -> ClientResult<HistoryPage> {
        let response = self
            .request(reqwest::Method::GET, &format!("/api/payments/{}/history", payment_id))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        self.handle(response).await
    }

    async fn fetch_record(&self, payment_id: &str) -> ClientResult<PaymentRecord> {
        let response = self
            .request(reqwest::Method::GET, &format!("/api/payments/{}", payment_id))
            .send()
            .await?;
        self.handle(response).await
    }

    async fn fetch_unpaid_periods(&self, payment_id: &str) -> ClientResult<Vec<UnpaidPeriod>> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/api/payments/{}/unpaid-periods", payment_id),
            )
            .send()
            .await?;
        self.handle(response).await
    }

    async fn recalc(&self, payment_id: &str) -> ClientResult<()> {
        let response = self
            .request(reqwest::Method::POST, &format!("/api/payments/{}/recalc", payment_id))
            .send()
            .await?;
        self.handle_empty(response).await
    }

    async fn set_invoice_sent(&self, entry_id: &str, sent: bool) -> ClientResult<HistoryEntry> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/api/transactions/{}/invoice-sent", entry_id),
            )
            .json(&SetInvoiceSentRequest { invoice_sent: sent })
            .send()
            .await?;
        self.handle(response).await
    }

    async fn apply_family_discount(
        &self,
        payment_id: &str,
        req: ApplyDiscountRequest,
    ) -> ClientResult<AdjustmentSummary> {
        let response = self
            .request(reqwest::Method::POST, &format!("/api/payments/{}/discount", payment_id))
            .json(&req)
            .send()
            .await?;
        self.handle(response).await
    }

    async fn apply_family_route_type(
        &self,
        payment_id: &str,
        req: ApplyRouteTypeRequest,
    ) -> ClientResult<AdjustmentSummary> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/api/payments/{}/route-type", payment_id),
            )
            .json(&req)
            .send()
            .await?;
        self.handle(response).await
    }

    async fn set_user_state(
        &self,
        payment_id: &str,
        suspended: bool,
    ) -> ClientResult<PaymentRecord> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/api/payments/{}/user-state", payment_id),
            )
            .json(&SetUserStateRequest { suspended })
            .send()
            .await?;
        self.handle(response).await
    }

    async fn set_penalty_frozen(
        &self,
        payment_id: &str,
        frozen: bool,
    ) -> ClientResult<PaymentRecord> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/api/payments/{}/penalty-frozen", payment_id),
            )
            .json(&SetPenaltyFrozenRequest { frozen })
            .send()
            .await?;
        self.handle(response).await
    }

    async fn exonerate_penalty(&self, payment_id: &str, amount: f64) -> ClientResult<PaymentRecord> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/api/payments/{}/penalty/exonerate", payment_id),
            )
            .json(&ExoneratePenaltyRequest { amount })
            .send()
            .await?;
        self.handle(response).await
    }

    async fn update_receipt_number(
        &self,
        payment_id: &str,
        receipt_number: &str,
    ) -> ClientResult<PaymentRecord> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/api/payments/{}/receipt-number", payment_id),
            )
            .json(&UpdateReceiptRequest {
                receipt_number: receipt_number.to_string(),
            })
            .send()
            .await?;
        self.handle(response).await
    }

    async fn update_notes(&self, payment_id: &str, notes: &str) -> ClientResult<PaymentRecord> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/api/payments/{}/notes", payment_id))
            .json(&UpdateNotesRequest {
                notes: notes.to_string(),
            })
            .send()
            .await?;
        self.handle(response).await
    }

    async fn reverse_payment(&self, payment_id: &str) -> ClientResult<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/api/payments/{}", payment_id))
            .send()
            .await?;
        self.handle_empty(response).await
    }
}

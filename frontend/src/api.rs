use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config;
use crate::error::ApiError;
use crate::models::{AccountSummary, Installment, Loan, LoanType, Member};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Summaries,
    Members,
    Schedules,
    Loans,
    MarkPaid(i64),
    UpdateBreakdown,
    RevertToOriginal,
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Summaries => "/payment-schedules/summaries/".to_string(),
            Endpoint::Members => "/members/".to_string(),
            Endpoint::Schedules => "/payment-schedules/".to_string(),
            Endpoint::Loans => "/loans/".to_string(),
            Endpoint::MarkPaid(id) => format!("/payment-schedules/{}/mark-paid/", id),
            Endpoint::UpdateBreakdown => "/update-breakdown/".to_string(),
            Endpoint::RevertToOriginal => "/revert-to-original/".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkPaidBody {
    pub received_amount: f64,
    pub account_number: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpdateBreakdownBody {
    pub schedules_id: Vec<i64>,
    pub new_amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RevertBody {
    pub schedules_id: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub async fn fetch_summaries(&self) -> Result<Vec<AccountSummary>, ApiError> {
        self.get_json(Endpoint::Summaries, &[]).await
    }

    /// The members endpoint filters by account number and returns a list;
    /// the first match is the holder.
    pub async fn fetch_member(&self, account_number: &str) -> Result<Option<Member>, ApiError> {
        let members: Vec<Member> = self
            .get_json(Endpoint::Members, &[("account_number", account_number)])
            .await?;
        Ok(members.into_iter().next())
    }

    pub async fn fetch_schedules(
        &self,
        account_number: &str,
        loan_type: LoanType,
    ) -> Result<Vec<Installment>, ApiError> {
        self.get_json(
            Endpoint::Schedules,
            &[
                ("account_number", account_number),
                ("loan_type", loan_type.as_str()),
            ],
        )
        .await
    }

    pub async fn fetch_loan(
        &self,
        account_number: &str,
        loan_type: LoanType,
    ) -> Result<Option<Loan>, ApiError> {
        let loans: Vec<Loan> = self
            .get_json(
                Endpoint::Loans,
                &[
                    ("account_number", account_number),
                    ("loan_type", loan_type.as_str()),
                ],
            )
            .await?;
        Ok(loans.into_iter().next())
    }

    pub async fn mark_paid(&self, installment_id: i64, body: &MarkPaidBody) -> Result<(), ApiError> {
        self.post_json(Endpoint::MarkPaid(installment_id), body).await
    }

    pub async fn update_breakdown(&self, body: &UpdateBreakdownBody) -> Result<(), ApiError> {
        self.post_json(Endpoint::UpdateBreakdown, body).await
    }

    pub async fn revert_to_original(&self, body: &RevertBody) -> Result<(), ApiError> {
        self.post_json(Endpoint::RevertToOriginal, body).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        log::debug!("GET {} {:?}", url, query);
        let req = authorized(Request::get(&url)).query(query.iter().copied());
        let resp = checked(req.send().await?).await?;
        Ok(resp.json::<T>().await?)
    }

    /// Acknowledgement bodies are not used; only the status matters.
    async fn post_json<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<(), ApiError> {
        let url = self.url(endpoint);
        log::debug!("POST {}", url);
        let req = authorized(Request::post(&url)).json(body)?;
        checked(req.send().await?).await?;
        Ok(())
    }
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match config::read_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn checked(resp: Response) -> Result<Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    log::warn!("{} returned {}: {}", resp.url(), status, body);
    Err(ApiError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths_match_backend_routes() {
        assert_eq!(Endpoint::Summaries.path(), "/payment-schedules/summaries/");
        assert_eq!(Endpoint::MarkPaid(42).path(), "/payment-schedules/42/mark-paid/");
        assert_eq!(Endpoint::UpdateBreakdown.path(), "/update-breakdown/");
        assert_eq!(Endpoint::RevertToOriginal.path(), "/revert-to-original/");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = ApiClient::new("http://127.0.0.1:8000/");
        assert_eq!(
            api.url(Endpoint::Loans),
            "http://127.0.0.1:8000/loans/"
        );
    }

    #[test]
    fn request_bodies_use_backend_field_names() {
        let body = serde_json::to_value(MarkPaidBody {
            received_amount: 1000.0,
            account_number: "1001".to_string(),
        })
        .unwrap();
        assert_eq!(body["received_amount"].as_f64(), Some(1000.0));
        assert_eq!(body["account_number"], "1001");

        let body = serde_json::to_value(UpdateBreakdownBody {
            schedules_id: vec![3, 4],
            new_amount: 500.0,
        })
        .unwrap();
        assert_eq!(body["schedules_id"], serde_json::json!([3, 4]));
        assert_eq!(body["new_amount"].as_f64(), Some(500.0));

        let body = serde_json::to_value(RevertBody { schedules_id: vec![1] }).unwrap();
        assert_eq!(body, serde_json::json!({"schedules_id": [1]}));
    }
}

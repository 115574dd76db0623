//! Handlers for plans and the stubbed subscription checkout.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/plans` | The plan catalogue |
//! | `GET`  | `/subscription` | Current selection |
//! | `POST` | `/subscription/checkout` | Body: `{"plan":"pro"}`; records the choice, takes no payment |

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use folio_core::{
  plan::{Plan, PlanType, Subscription, catalogue},
  store::FolioStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shown after a stubbed checkout.
pub const CHECKOUT_NOTICE: &str = "In production, this would redirect to Stripe Checkout";

/// `GET /plans`
pub async fn list() -> Json<Vec<Plan>> { Json(catalogue()) }

/// `GET /subscription`
pub async fn subscription<S>(State(store): State<Arc<S>>) -> Result<Json<Subscription>, ApiError>
where
  S: FolioStore,
{
  let subscription = store.subscription().await.map_err(ApiError::store)?;
  Ok(Json(subscription))
}

#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
  pub plan: PlanType,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
  pub subscription: Subscription,
  pub message:      &'static str,
}

/// `POST /subscription/checkout`
pub async fn checkout<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CheckoutBody>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
  S: FolioStore,
{
  let subscription = store
    .update_subscription(Subscription::stub_checkout(body.plan, Utc::now()))
    .await
    .map_err(ApiError::store)?;
  tracing::info!(plan = %subscription.current_plan, "plan selected (no payment taken)");
  Ok(Json(CheckoutResponse {
    subscription,
    message: CHECKOUT_NOTICE,
  }))
}

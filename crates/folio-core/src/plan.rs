//! Pricing plans and the current subscription selection.
//!
//! Payment is stubbed: selecting a plan only records the choice.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlanType {
  #[default]
  Free,
  Pro,
  Business,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
  /// Maximum number of blocks; `None` is unlimited.
  pub links:         Option<u32>,
  pub analytics:     bool,
  pub custom_domain: bool,
  pub themes:        bool,
}

impl PlanLimits {
  /// Blocks still available after `used`; `None` is unlimited.
  pub fn remaining_links(&self, used: usize) -> Option<u32> {
    self
      .links
      .map(|max| max.saturating_sub(u32::try_from(used).unwrap_or(u32::MAX)))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
  #[serde(rename = "type")]
  pub plan_type: PlanType,
  pub name:      String,
  /// Monthly price in whole dollars.
  pub price:     u32,
  pub tagline:   String,
  pub features:  Vec<String>,
  pub limits:    PlanLimits,
}

impl PlanType {
  pub fn plan(self) -> Plan {
    let features = |list: &[&str]| list.iter().map(|f| (*f).to_owned()).collect();
    match self {
      Self::Free => Plan {
        plan_type: self,
        name:      "Free".into(),
        price:     0,
        tagline:   "Get started with basic features".into(),
        features:  features(&[
          "Basic profile customization",
          "Up to 5 links",
          "Basic analytics",
          "Standard themes",
        ]),
        limits:    PlanLimits {
          links:         Some(5),
          analytics:     false,
          custom_domain: false,
          themes:        false,
        },
      },
      Self::Pro => Plan {
        plan_type: self,
        name:      "Pro".into(),
        price:     9,
        tagline:   "Perfect for creators and professionals".into(),
        features:  features(&[
          "Advanced profile customization",
          "Unlimited links",
          "Detailed analytics",
          "Custom themes",
          "Priority support",
        ]),
        limits:    PlanLimits {
          links:         None,
          analytics:     true,
          custom_domain: false,
          themes:        true,
        },
      },
      Self::Business => Plan {
        plan_type: self,
        name:      "Business".into(),
        price:     29,
        tagline:   "For teams and businesses".into(),
        features:  features(&[
          "Everything in Pro",
          "Custom domain",
          "Team collaboration",
          "API access",
          "Dedicated support",
        ]),
        limits:    PlanLimits {
          links:         None,
          analytics:     true,
          custom_domain: true,
          themes:        true,
        },
      },
    }
  }
}

/// All plans in display order.
pub fn catalogue() -> Vec<Plan> { PlanType::iter().map(PlanType::plan).collect() }

/// The selected plan, persisted as one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subscription {
  pub current_plan:    PlanType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subscription_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub expires_at:      Option<DateTime<Utc>>,
}

impl Subscription {
  /// What a checkout would record for `plan` at `now`, with no payment
  /// taken. Paid plans get a stub id and a one-month term.
  pub fn stub_checkout(plan: PlanType, now: DateTime<Utc>) -> Self {
    match plan {
      PlanType::Free => Self::default(),
      paid => Self {
        current_plan:    paid,
        subscription_id: Some(format!("stub_{}", Uuid::new_v4().simple())),
        expires_at:      now.checked_add_months(Months::new(1)),
      },
    }
  }
}

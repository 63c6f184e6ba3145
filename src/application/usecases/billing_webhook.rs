// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::dto::billing_event::{BillingEvent, SubscriptionEventData, UserEventData};
use crate::application::usecases::subscriptions::{SubscriptionChange, SubscriptionUseCase};
use crate::application::usecases::UseCaseError;
use crate::domain::models::subscription::{SubscriptionPlan, SubscriptionStatus};
use crate::domain::services::webhook_verifier::{SignatureHeaders, WebhookVerifier};
use crate::infrastructure::metrics::BILLING_EVENTS_TOTAL;

/// 事件处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingOutcome {
    Handled,
    Ignored,
}

/// 计费回调用例
///
/// 验签后按事件类型更新订阅。未识别的事件只记录日志。
pub struct BillingWebhookUseCase {
    verifier: Arc<dyn WebhookVerifier>,
    subscriptions: Arc<SubscriptionUseCase>,
    pro_plan_id: String,
}

fn event_data<T: DeserializeOwned>(event: &BillingEvent) -> Result<T, UseCaseError> {
    serde_json::from_value(event.data.clone()).map_err(|e| {
        UseCaseError::validation(format!("Invalid data for {} event: {}", event.event_type, e))
    })
}

fn from_unix(seconds: Option<i64>) -> Option<DateTime<Utc>> {
    seconds.and_then(|s| DateTime::from_timestamp(s, 0))
}

impl BillingWebhookUseCase {
    pub fn new(
        verifier: Arc<dyn WebhookVerifier>,
        subscriptions: Arc<SubscriptionUseCase>,
        pro_plan_id: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            subscriptions,
            pro_plan_id: pro_plan_id.into(),
        }
    }

    /// 处理一次回调
    ///
    /// `headers` 为 None 表示请求缺少签名头，无论是否配置密钥都直接拒绝。
    pub async fn execute(
        &self,
        headers: Option<SignatureHeaders>,
        body: &[u8],
    ) -> Result<BillingOutcome, UseCaseError> {
        let headers = headers.ok_or_else(|| UseCaseError::validation("Missing svix headers"))?;
        if self.verifier.is_enabled() {
            self.verifier.verify(&headers, body)?;
        } else {
            warn!("Billing webhook secret not configured, skipping signature verification");
        }

        let event: BillingEvent = serde_json::from_slice(body)
            .map_err(|e| UseCaseError::validation(format!("Invalid webhook payload: {}", e)))?;

        let outcome = self.dispatch(&event).await?;
        let label = match outcome {
            BillingOutcome::Handled => "handled",
            BillingOutcome::Ignored => "ignored",
        };
        counter!(BILLING_EVENTS_TOTAL, "type" => event.event_type.clone(), "outcome" => label)
            .increment(1);
        Ok(outcome)
    }

    async fn dispatch(&self, event: &BillingEvent) -> Result<BillingOutcome, UseCaseError> {
        match event.event_type.as_str() {
            "user.created" => {
                let data: UserEventData = event_data(event)?;
                self.subscriptions.initialize(&data.id).await?;
                info!(user_id = %data.id, "Subscription initialized for new user");
            }
            "subscription.created" | "subscription.updated" => {
                let data: SubscriptionEventData = event_data(event)?;
                let change = self.subscription_change(&data);
                info!(
                    user_id = %data.user_id,
                    event_type = %event.event_type,
                    plan = %change.plan,
                    status = %change.status,
                    "Applying subscription change"
                );
                self.subscriptions
                    .create_or_update(&data.user_id, change)
                    .await?;
            }
            "subscription.deleted" => {
                let data: SubscriptionEventData = event_data(event)?;
                self.subscriptions.cancel(&data.user_id).await?;
                info!(user_id = %data.user_id, "Subscription canceled");
            }
            other => {
                info!(event_type = %other, "Unhandled billing event");
                return Ok(BillingOutcome::Ignored);
            }
        }
        Ok(BillingOutcome::Handled)
    }

    fn subscription_change(&self, data: &SubscriptionEventData) -> SubscriptionChange {
        let plan = if data.plan_id.as_deref() == Some(self.pro_plan_id.as_str()) {
            SubscriptionPlan::Pro
        } else {
            SubscriptionPlan::Starter
        };
        let status = data
            .status
            .as_deref()
            .map(SubscriptionStatus::from_vendor)
            .unwrap_or(SubscriptionStatus::Canceled);

        let now = Utc::now();
        let start = from_unix(data.current_period_start).unwrap_or(now);
        let end = from_unix(data.current_period_end).unwrap_or(start + Duration::days(30));

        SubscriptionChange {
            plan,
            status,
            current_period_start: start,
            current_period_end: end,
        }
    }
}

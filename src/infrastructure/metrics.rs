// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const JOBS_CREATED_TOTAL: &str = "serplens_jobs_created_total";
pub const JOBS_FINISHED_TOTAL: &str = "serplens_jobs_finished_total";
pub const SCRAPER_WEBHOOKS_TOTAL: &str = "serplens_scraper_webhooks_total";
pub const LLM_REQUESTS_TOTAL: &str = "serplens_llm_requests_total";
pub const LLM_REQUEST_DURATION_SECONDS: &str = "serplens_llm_request_duration_seconds";
pub const CHAT_MESSAGES_TOTAL: &str = "serplens_chat_messages_total";
pub const BILLING_EVENTS_TOTAL: &str = "serplens_billing_events_total";

/// 安装 Prometheus 导出器并注册指标说明
///
/// 地址无效或端口被占用时只记录警告，服务照常启动。
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics listen address {}: {}", settings.listen_addr, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return;
    }

    describe_counter!(JOBS_CREATED_TOTAL, "Report jobs submitted");
    describe_counter!(JOBS_FINISHED_TOTAL, "Report jobs that reached a terminal status");
    describe_counter!(SCRAPER_WEBHOOKS_TOTAL, "Scraper vendor callbacks received");
    describe_counter!(LLM_REQUESTS_TOTAL, "Requests sent to the LLM provider");
    describe_histogram!(
        LLM_REQUEST_DURATION_SECONDS,
        "Latency of LLM provider requests in seconds"
    );
    describe_counter!(CHAT_MESSAGES_TOTAL, "Chat messages answered");
    describe_counter!(BILLING_EVENTS_TOTAL, "Billing webhook events processed");

    info!("Metrics exporter listening on {}", addr);
}

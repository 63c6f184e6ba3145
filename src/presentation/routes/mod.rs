// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::billing_webhook::BillingWebhookUseCase;
use crate::application::usecases::chat::ChatUseCase;
use crate::application::usecases::process_scraper_webhook::ProcessScraperWebhookUseCase;
use crate::application::usecases::start_report::StartReportUseCase;
use crate::application::usecases::subscriptions::SubscriptionUseCase;
use crate::config::settings::Settings;
use crate::infrastructure::repositories::chat_repo_impl::ChatRepositoryImpl;
use crate::infrastructure::repositories::scraping_job_repo_impl::ScrapingJobRepositoryImpl;
use crate::infrastructure::repositories::subscription_repo_impl::SubscriptionRepositoryImpl;
use crate::infrastructure::services::bright_data_scraper::BrightDataScraper;
use crate::infrastructure::services::openai_llm_service::OpenAiLlmService;
use crate::infrastructure::services::svix_verifier::SvixVerifier;
use crate::presentation::handlers::{
    billing_webhook_handler, chat_handler, job_handler, scraper_webhook_handler,
    subscription_handler,
};
use axum::{
    routing::{delete, get, patch, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 路由依赖的用例集合
#[derive(Clone)]
pub struct AppServices {
    pub start_report: Arc<StartReportUseCase>,
    pub scraper_webhook: Arc<ProcessScraperWebhookUseCase>,
    pub chat: Arc<ChatUseCase>,
    pub subscriptions: Arc<SubscriptionUseCase>,
    pub billing_webhook: Arc<BillingWebhookUseCase>,
}

impl AppServices {
    /// 以数据库连接和配置装配全部用例
    pub fn new(settings: &Settings, db: Arc<DatabaseConnection>) -> anyhow::Result<Self> {
        let jobs = Arc::new(ScrapingJobRepositoryImpl::new(db.clone()));
        let chats = Arc::new(ChatRepositoryImpl::new(db.clone()));
        let subscription_repo = Arc::new(SubscriptionRepositoryImpl::new(db));

        let scraper = Arc::new(BrightDataScraper::new(settings.scraper.clone())?);
        let llm = Arc::new(OpenAiLlmService::new(settings.llm.clone())?);
        let verifier = Arc::new(SvixVerifier::new(
            settings.billing.webhook_secret.as_deref(),
            settings.billing.timestamp_tolerance_secs,
        )?);

        let subscriptions = Arc::new(SubscriptionUseCase::new(subscription_repo));

        Ok(Self {
            start_report: Arc::new(StartReportUseCase::new(
                jobs.clone(),
                scraper,
                subscriptions.clone(),
            )),
            scraper_webhook: Arc::new(ProcessScraperWebhookUseCase::new(
                jobs.clone(),
                llm.clone(),
            )),
            chat: Arc::new(ChatUseCase::new(chats, jobs, llm, subscriptions.clone())),
            billing_webhook: Arc::new(BillingWebhookUseCase::new(
                verifier,
                subscriptions.clone(),
                settings.billing.pro_plan_id.clone(),
            )),
            subscriptions,
        })
    }
}

/// 创建应用路由
///
/// 用户路由需要 `X-User-Id` 头；两个 webhook 路由由供应商调用，不需要。
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let webhook_routes = Router::new()
        .route("/api/webhook", post(scraper_webhook_handler::receive))
        .route("/api/billing/webhook", post(billing_webhook_handler::receive));

    let user_routes = Router::new()
        .route(
            "/v1/jobs",
            post(job_handler::create_job).get(job_handler::list_jobs),
        )
        .route("/v1/jobs/{id}", get(job_handler::get_job))
        .route(
            "/v1/jobs/snapshot/{snapshot_id}",
            get(job_handler::get_job_by_snapshot),
        )
        .route(
            "/v1/jobs/{id}/chat/sessions",
            get(chat_handler::list_sessions),
        )
        .route("/v1/chat", post(chat_handler::send_message))
        .route(
            "/v1/chat/sessions/{id}/messages",
            get(chat_handler::get_messages),
        )
        .route("/v1/chat/sessions/{id}", patch(chat_handler::rename_session))
        .route("/v1/chat/messages/{id}", delete(chat_handler::delete_message))
        .route(
            "/v1/subscription",
            get(subscription_handler::get_subscription),
        );

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(user_routes)
}

/// 组装带依赖与请求追踪的完整应用
pub fn build_app(services: AppServices) -> Router {
    routes()
        .layer(Extension(services.start_report))
        .layer(Extension(services.scraper_webhook))
        .layer(Extension(services.chat))
        .layer(Extension(services.subscriptions))
        .layer(Extension(services.billing_webhook))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

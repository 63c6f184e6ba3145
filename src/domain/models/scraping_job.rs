// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// 抓取任务实体
///
/// 一次 SEO 报告请求的完整生命周期：用户输入、供应商快照、
/// 原始抓取结果、生成的报告以及失败原因。任务创建后只会被
/// 回调修改，从不删除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 提交任务的用户
    pub user_id: String,
    /// 用户输入的实体描述
    pub prompt: String,
    /// 抓取供应商分配的快照 ID
    pub snapshot_id: Option<String>,
    /// 任务状态
    pub status: JobStatus,
    /// 供应商回调的原始结果数组
    pub results: Option<Value>,
    /// LLM 生成并通过校验的 SEO 报告
    pub seo_report: Option<Value>,
    /// 失败原因
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 进入终态的时间
    pub completed_at: Option<DateTime<Utc>>,
}

/// 任务状态枚举
///
/// 状态转换遵循以下流程：
/// Pending → Running → Analyzing → Completed
/// 任何非终态都可以转换为 Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 已创建，尚未被供应商受理
    #[default]
    Pending,
    /// 供应商正在抓取
    Running,
    /// 已收到抓取结果，正在生成报告
    Analyzing,
    /// 报告已生成
    Completed,
    /// 抓取或分析失败
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Analyzing => "analyzing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "analyzing" => Ok(JobStatus::Analyzing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(()),
        }
    }
}

impl ScrapingJob {
    /// 创建一个新的待处理任务
    pub fn new(user_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            prompt: prompt.into(),
            snapshot_id: None,
            status: JobStatus::Pending,
            results: None,
            seo_report: None,
            error: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    fn transition(&self, to: JobStatus) -> DomainError {
        DomainError::InvalidStateTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }

    /// 供应商已受理抓取请求
    ///
    /// Pending → Running
    pub fn start(mut self, snapshot_id: Option<String>) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Pending => {
                self.status = JobStatus::Running;
                self.snapshot_id = snapshot_id;
                self.updated_at = Utc::now();
                Ok(self)
            }
            _ => Err(self.transition(JobStatus::Running)),
        }
    }

    /// 收到抓取结果，开始生成报告
    ///
    /// Pending | Running → Analyzing。回调可能早于触发响应写回，
    /// 因此 Pending 也可以直接进入分析。
    pub fn begin_analysis(mut self, results: Value) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Pending | JobStatus::Running => {
                self.status = JobStatus::Analyzing;
                self.results = Some(results);
                self.updated_at = Utc::now();
                Ok(self)
            }
            _ => Err(self.transition(JobStatus::Analyzing)),
        }
    }

    /// 报告生成完成
    ///
    /// Analyzing → Completed
    pub fn complete(mut self, seo_report: Value) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::Analyzing => {
                let now = Utc::now();
                self.status = JobStatus::Completed;
                self.seo_report = Some(seo_report);
                self.updated_at = now;
                self.completed_at = Some(now);
                Ok(self)
            }
            _ => Err(self.transition(JobStatus::Completed)),
        }
    }

    /// 标记任务失败
    ///
    /// 任意非终态 → Failed
    pub fn fail(mut self, error: impl Into<String>) -> Result<Self, DomainError> {
        if self.status.is_terminal() {
            return Err(self.transition(JobStatus::Failed));
        }
        let now = Utc::now();
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.updated_at = now;
        self.completed_at = Some(now);
        Ok(self)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

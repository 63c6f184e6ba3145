// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! SEO 报告模式
//!
//! LLM 返回的报告先反序列化为强类型结构，再通过 `validator` 校验
//! 取值范围与数组长度。任一步骤失败都视为报告生成失败。

pub mod scraping_data;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

pub use scraping_data::{ScrapingData, Source};

/// 报告解析错误
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report does not match the expected structure: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Report failed validation: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// 完整的 SEO 报告
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SeoReport {
    #[validate(nested)]
    pub meta: Meta,
    #[validate(nested)]
    pub inventory: Inventory,
    #[validate(nested)]
    pub serp_overview: SerpOverview,
    #[validate(nested)]
    pub on_page: OnPage,
    #[validate(nested)]
    pub content_analysis: ContentAnalysis,
    #[validate(nested)]
    pub keywords: Keywords,
    #[validate(length(min = 3, max = 15), nested)]
    pub competitors: Vec<Competitor>,
    pub local_seo: LocalSeo,
    #[validate(length(min = 3, max = 25))]
    pub recommendations: Vec<Recommendation>,
    #[validate(nested)]
    pub summary: Summary,
}

impl SeoReport {
    /// 反序列化并校验 LLM 输出
    pub fn parse(value: Value) -> Result<Self, ReportError> {
        let report: SeoReport = serde_json::from_value(value)?;
        report.validate()?;
        Ok(report)
    }

    /// 规范化后的 JSON，用于持久化
    pub fn to_value(&self) -> Result<Value, ReportError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Person,
    Business,
    Product,
    Course,
    Website,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Meta {
    pub entity_name: String,
    pub entity_type: EntityType,
    pub analysis_date: String,
    #[validate(range(min = 0.0))]
    pub data_sources_count: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_score: f64,
}

/// 引用证据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Inventory {
    #[validate(range(min = 0.0))]
    pub total_sources: f64,
    pub unique_domains: Vec<String>,
    #[validate(nested)]
    pub source_types: SourceTypes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub source_quality_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_depth_indicators: Option<Vec<String>>,
    pub date_range: DateRange,
}

/// 按类型归类的来源
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceTypes {
    #[validate(nested)]
    pub social_media: Vec<CategorizedSource>,
    #[validate(nested)]
    pub professional: Vec<CategorizedSource>,
    #[validate(nested)]
    pub educational: Vec<CategorizedSource>,
    #[validate(nested)]
    pub community: Vec<CategorizedSource>,
    #[validate(nested)]
    pub news: Vec<CategorizedSource>,
    #[validate(nested)]
    pub other: Vec<CategorizedSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategorizedSource {
    pub domain: String,
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub quality_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

/// high / medium / low / unknown 四级评估
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    High,
    Medium,
    Low,
    Unknown,
}

/// 不含 unknown 的三级评估
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SerpOverview {
    #[validate(length(max = 25))]
    pub primary_keywords: Vec<String>,
    pub search_volume_estimate: Level,
    pub competition_level: Level,
    #[validate(length(max = 10), nested)]
    pub top_results: Vec<TopResult>,
    #[validate(length(max = 12))]
    pub serp_features: Vec<SerpFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TopResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[validate(range(min = 0.0))]
    pub position: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerpFeatureType {
    FeaturedSnippet,
    KnowledgePanel,
    Images,
    Videos,
    News,
    LocalPack,
    RelatedSearches,
    PeopleAlsoAsk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpFeature {
    #[serde(rename = "type")]
    pub feature_type: SerpFeatureType,
    pub present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readability {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

/// 页面层面的信号，无法从公开数据获取时为 null
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OnPage {
    pub title_tag: Option<String>,
    pub meta_description: Option<String>,
    pub headings: Headings,
    #[validate(range(min = 0.0))]
    pub content_length: Option<f64>,
    pub readability_score: Readability,
    #[validate(range(min = 0.0))]
    pub internal_links: Option<f64>,
    #[validate(range(min = 0.0))]
    pub external_links: Option<f64>,
    #[validate(range(min = 0.0))]
    pub images_with_alt: Option<f64>,
    #[validate(range(min = 0.0))]
    pub total_images: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContentAnalysis {
    #[validate(nested)]
    pub content_themes: Vec<ContentTheme>,
    #[validate(nested)]
    pub sentiment: Sentiment,
    pub expertise_indicators: Vec<String>,
    pub content_gaps: Vec<String>,
    pub unique_value_propositions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_depth_indicators: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_mentions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContentTheme {
    pub theme: String,
    #[validate(range(min = 0.0))]
    pub frequency: f64,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

/// 情感分析，可以是简单标签或带比例分解的详细对象
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sentiment {
    Label(SentimentLabel),
    Detailed(DetailedSentiment),
}

impl Validate for Sentiment {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Sentiment::Label(_) => Ok(()),
            Sentiment::Detailed(detailed) => detailed.validate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DetailedSentiment {
    pub overall: String,
    #[validate(nested)]
    pub breakdown: SentimentBreakdown,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SentimentBreakdown {
    #[validate(range(min = 0.0, max = 1.0))]
    pub positive: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub neutral: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub negative: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchIntent {
    Informational,
    Navigational,
    Transactional,
    Commercial,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub search_volume: Level,
    pub difficulty: Level,
    pub intent: SearchIntent,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Keywords {
    #[validate(length(max = 25))]
    pub top_keywords: Vec<Keyword>,
    #[validate(length(max = 8), nested)]
    pub keyword_clusters: Vec<KeywordCluster>,
    pub long_tail_opportunities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_terms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_offerings: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct KeywordCluster {
    pub cluster_name: String,
    #[validate(length(max = 6))]
    pub keywords: Vec<Keyword>,
    pub theme: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Competitor,
    Employer,
    Partner,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Competitor {
    pub name: String,
    pub domain: String,
    #[validate(range(min = 0.0, max = 10.0))]
    pub strength_score: f64,
    pub overlap_keywords: Vec<String>,
    pub unique_advantages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalSeo {
    pub location_mentions: Vec<String>,
    pub local_keywords: Vec<String>,
    pub local_competitors: Vec<String>,
    pub local_citations: Vec<LocalCitation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationStatus {
    Verified,
    Unverified,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalCitation {
    pub platform: String,
    pub url: String,
    pub status: CitationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Content,
    Technical,
    LinkBuilding,
    LocalSeo,
    CompetitorAnalysis,
    KeywordOptimization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub expected_impact: Priority,
    pub effort_required: Priority,
    pub evidence: Vec<Evidence>,
    pub implementation_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_driven_insights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_quotes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Summary {
    #[validate(range(min = 0.0, max = 100.0))]
    pub overall_score: f64,
    pub key_strengths: Vec<String>,
    pub critical_issues: Vec<String>,
    pub quick_wins: Vec<String>,
    pub long_term_opportunities: Vec<String>,
}

/// 用于测试的最小合法报告
#[cfg(test)]
pub(crate) fn sample_report() -> Value {
    let competitor = |name: &str| {
        serde_json::json!({
            "name": name,
            "domain": format!("{}.com", name.to_lowercase()),
            "strength_score": 6.5,
            "overlap_keywords": ["bakery portland"],
            "unique_advantages": ["longer opening hours"],
            "evidence": [{ "url": "https://example.com/review" }]
        })
    };
    let recommendation = |title: &str| {
        serde_json::json!({
            "category": "content",
            "priority": "high",
            "title": title,
            "description": "Publish a seasonal menu page.",
            "expected_impact": "medium",
            "effort_required": "low",
            "evidence": [],
            "implementation_steps": ["Draft copy", "Publish"]
        })
    };
    serde_json::json!({
        "meta": {
            "entity_name": "Acme Bakery",
            "entity_type": "business",
            "analysis_date": "2025-03-01",
            "data_sources_count": 4,
            "confidence_score": 0.8
        },
        "inventory": {
            "total_sources": 4,
            "unique_domains": ["acmebakery.com", "yelp.com"],
            "source_types": {
                "social_media": [],
                "professional": [],
                "educational": [],
                "community": [{
                    "domain": "yelp.com",
                    "url": "https://yelp.com/biz/acme",
                    "title": "Acme Bakery - Yelp",
                    "description": "Reviews",
                    "quality_score": 0.7
                }],
                "news": [],
                "other": []
            },
            "date_range": { "earliest": null, "latest": "2025-02-20" }
        },
        "serp_overview": {
            "primary_keywords": ["acme bakery"],
            "search_volume_estimate": "low",
            "competition_level": "medium",
            "top_results": [{
                "title": "Acme Bakery",
                "url": "https://acmebakery.com",
                "snippet": "Fresh bread daily",
                "position": 1
            }],
            "serp_features": [{ "type": "local_pack", "present": true }]
        },
        "on_page": {
            "title_tag": null,
            "meta_description": null,
            "headings": { "h1": [], "h2": [], "h3": [] },
            "content_length": null,
            "readability_score": "unknown",
            "internal_links": null,
            "external_links": null,
            "images_with_alt": null,
            "total_images": null
        },
        "content_analysis": {
            "content_themes": [{ "theme": "sourdough", "frequency": 3, "evidence": [] }],
            "sentiment": "positive",
            "expertise_indicators": [],
            "content_gaps": ["no online ordering"],
            "unique_value_propositions": ["organic flour"]
        },
        "keywords": {
            "top_keywords": [{
                "keyword": "sourdough portland",
                "search_volume": "medium",
                "difficulty": "low",
                "intent": "transactional",
                "evidence": []
            }],
            "keyword_clusters": [],
            "long_tail_opportunities": ["gluten free bakery near me"]
        },
        "competitors": [competitor("Alpha"), competitor("Beta"), competitor("Gamma")],
        "local_seo": {
            "location_mentions": ["Portland"],
            "local_keywords": [],
            "local_competitors": [],
            "local_citations": [{ "platform": "Yelp", "url": "https://yelp.com/biz/acme", "status": "unverified" }]
        },
        "recommendations": [
            recommendation("Seasonal menu"),
            recommendation("Claim listings"),
            recommendation("Collect reviews")
        ],
        "summary": {
            "overall_score": 62,
            "key_strengths": ["strong reviews"],
            "critical_issues": [],
            "quick_wins": ["add opening hours"],
            "long_term_opportunities": []
        }
    })
}

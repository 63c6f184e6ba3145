// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 固定提示词
//!
//! 抓取供应商的研究提示、报告分析提示以及对话系统提示。

use serde_json::Value;

pub use crate::domain::models::chat::chat_title;

/// 报告必须包含的顶层键
pub const REPORT_SECTIONS: [&str; 10] = [
    "meta",
    "inventory",
    "serp_overview",
    "on_page",
    "content_analysis",
    "keywords",
    "competitors",
    "local_seo",
    "recommendations",
    "summary",
];

/// 发送给抓取供应商的 SERP 研究提示
pub fn build_research_prompt(target: &str) -> String {
    format!(
        "You are an SEO research assistant.

TASK: Given the target below, describe the entity and how it appears in search results.
The target may be a person, business, product, course, or website/URL.

TARGET: {target}

INSTRUCTIONS:
1. Search the web for the target and identify:
   - Official website(s) and candidate websites
   - Official social profiles
   - News, reviews, or directory listings
   - Competitors or similar entities
2. For each relevant result, extract:
   - \"title\"
   - \"url\"
   - \"description\" (short snippet or summary)
   - \"position\" (approximate SERP order if available)
3. Write a short answer_text narrative describing the entity based on these results.",
        target = target.trim()
    )
}

/// 将抓取结果转换为 SEO 报告的分析提示
pub fn build_report_prompt(payload: &Value) -> String {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    let keys = REPORT_SECTIONS
        .iter()
        .map(|key| format!("  \"{}\": ...", key))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "You are an expert SEO analyst.

INPUT: The JSON array below was returned by a web search. Use ONLY this payload to build the report.
Do not add extra keys. Do not output prose.

SEARCH PAYLOAD:
```json
{pretty}
```

TASK: Produce a comprehensive SEO report as a single JSON object.

RULES:
1. Treat \"prompt\" as the entity. Infer meta.entity_type as person|business|product|course|website|unknown.
2. Base all evidence on \"sources[]\". Every subsection needs at least one evidence item whose \"url\" comes from sources[], with a short \"quote\" where possible.
3. Normalize values:
   - Dates are ISO 8601 UTC
   - Numbers are numbers and booleans are true/false
   - Every array is present, possibly empty
   - Sources are deduplicated by canonical host
4. When information is unavailable use null or [].
5. Only include sections that public web search results can support. Leave out sections that need private tools or telemetry such as technical_seo and backlinks.
6. Hard caps:
   - competitors: at least 3, at most 10
   - top_keywords <= 25
   - keyword_clusters <= 8, each with <= 6 keywords
   - top_results <= 10
   - serp_features <= 12
   - recommendations: at least 3, at most 25
   - scores: confidence and quality in [0, 1], competitor strength in [0, 10], summary.overall_score in [0, 100]

OUTPUT: Return exactly one JSON object with these keys:
{{
{keys}
}}

Do not invent facts beyond the sources. Cite evidence everywhere. Output JSON only."
    )
}

/// 对话助手的系统提示，附带报告数据时要求引用具体指标
pub fn build_chat_system_prompt(report: Option<&Value>) -> String {
    let context = match report {
        Some(report) => format!(
            "Here is the SEO report data to reference when answering questions:\n\n{}\n\n\
             Use this data for specific, actionable insights and cite concrete metrics from the report where relevant.",
            serde_json::to_string_pretty(report).unwrap_or_else(|_| report.to_string())
        ),
        None => "You are helping with general SEO questions.".to_string(),
    };

    format!(
        "You are an expert SEO analyst chatbot who helps users understand and act on SEO reports.

{context}

Guidelines:
- Be accurate and specific
- Give actionable SEO recommendations
- Explain technical concepts in plain language
- Support answers with data from the report
- Say so when a question goes beyond what the report covers
- Keep responses concise"
    )
}

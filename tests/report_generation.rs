//! Report generators over a scripted backend: template fill, fenced-JSON
//! extraction, and failure surfacing.

mod common;

use common::MockBackend;
use lvtong::reports::{ReportError, ReportService};
use serde_json::json;

#[tokio::test]
async fn big_five_report_parses_fenced_json() {
    let reply = "分析完成。\n```json\n{\"radarData\": [3, 4, 2, 5, 1], \"personalityType\": \"平衡型实干家\"}\n```";
    let service = ReportService::new(MockBackend::replying(&[reply], 900));

    let answers = vec![json!("我喜欢尝试新事物"), json!("我做事有计划")];
    let data = service.big_five(&answers).await.unwrap();
    assert_eq!(data["radarData"][1], 4);
    assert_eq!(data["personalityType"], "平衡型实干家");
}

#[tokio::test]
async fn core_values_report_parses_fenced_json() {
    let reply = "```json\n{\"valueOrder\": [\"自主\", \"善行\", \"安全\", \"成就\", \"享乐\"]}\n```";
    let service = ReportService::new(MockBackend::replying(&[reply], 500));

    let data = service.core_values(&[json!("answer")]).await.unwrap();
    assert_eq!(data["valueOrder"][0], "自主");
}

#[tokio::test]
async fn holistic_report_combines_prior_reports() {
    let reply = "```json\n{\"reportTitle\": \"综合心理画像：你的内在力量与成长路径\"}\n```";
    let service = ReportService::new(MockBackend::replying(&[reply], 1200));

    let core_values = json!({"valueOrder": ["自主"]});
    let big_five = json!({"radarData": [3, 3, 3, 3, 3]});
    let data = service.holistic(&core_values, &big_five).await.unwrap();
    assert!(data["reportTitle"].as_str().unwrap().contains("综合心理画像"));
}

#[tokio::test]
async fn reply_without_fence_is_an_error() {
    let service = ReportService::new(MockBackend::replying(&["{\"bare\": true}"], 10));
    let err = service.big_five(&[json!("a")]).await.unwrap_err();
    assert!(matches!(err, ReportError::MissingJson));
}

#[tokio::test]
async fn upstream_failure_surfaces_as_completion_error() {
    let service = ReportService::new(MockBackend::failing());
    let err = service.core_values(&[json!("a")]).await.unwrap_err();
    assert!(matches!(err, ReportError::Completion(_)));
}

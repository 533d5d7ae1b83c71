use std::sync::Arc;
use std::time::Duration;

use ljk_batch_submit::{
    BatchOrchestrator, BatchStatus, CaptureAdapter, Config, HttpRecognitionClient, ItemState,
    SelectedFile,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn score_body(percentage: f64) -> serde_json::Value {
    serde_json::json!({
        "result_id": "r-1",
        "exam_id": "exam-1",
        "score": {
            "correct": 45,
            "wrong": 3,
            "unanswered": 2,
            "total_points": percentage,
            "percentage": percentage
        }
    })
}

fn sheets(adapter: &CaptureAdapter, names: &[&str]) -> Vec<ljk_batch_submit::DocumentHandle> {
    let files = names
        .iter()
        .map(|name| SelectedFile::new(*name, b"fake-ljk-scan".to_vec()))
        .collect();
    adapter.from_files(files).accepted
}

#[tokio::test]
async fn test_batch_against_http_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/process-ljk"))
        .and(body_string_contains("filename=\"b.jpg\""))
        .respond_with(
            ResponseTemplate::new(504).set_body_json(serde_json::json!({"detail": "timeout"})),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/process-ljk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_body(90.0)))
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        api_base_url: server.uri(),
        exam_id: "exam-1".to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    };
    let client = HttpRecognitionClient::new(&config).expect("创建客户端失败");
    let adapter = CaptureAdapter::from_config(&config);
    let mut orchestrator = BatchOrchestrator::from_config(Arc::new(client), &config);

    orchestrator
        .start_batch(sheets(&adapter, &["a.jpg", "b.jpg", "c.jpg"]))
        .expect("开始批次失败");
    let summary = orchestrator.run().await.expect("批次运行失败");

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(summary.is_complete);
    assert_eq!(summary.average_percentage, Some(90.0));

    let batch = orchestrator.current_snapshot();
    assert_eq!(batch.status(), BatchStatus::Complete);
    assert!(matches!(batch.items()[0].state(), ItemState::Succeeded(_)));
    assert_eq!(batch.items()[1].failure_reason(), Some("timeout"));
    assert!(matches!(batch.items()[2].state(), ItemState::Succeeded(_)));

    // 重复运行不会再次提交（expect 次数在 server drop 时校验）
    orchestrator.run().await.expect("重复运行失败");

    orchestrator.reset_batch();
    let batch = orchestrator.current_snapshot();
    assert!(batch.is_empty());
    assert!(batch.is_complete());
}

#[tokio::test]
async fn test_slow_service_marks_item_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/process-ljk"))
        .and(body_string_contains("filename=\"slow.jpg\""))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/process-ljk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_body(75.0)))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_base_url: server.uri(),
        exam_id: "exam-1".to_string(),
        request_timeout_secs: 1,
        ..Config::default()
    };
    let client = HttpRecognitionClient::new(&config).expect("创建客户端失败");
    let adapter = CaptureAdapter::from_config(&config);
    let mut orchestrator = BatchOrchestrator::from_config(Arc::new(client), &config);

    orchestrator
        .start_batch(sheets(&adapter, &["slow.jpg", "next.jpg"]))
        .expect("开始批次失败");
    let summary = orchestrator.run().await.expect("批次运行失败");

    // 超时和其他错误一样只影响当前答题卡
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 1);
    assert!(summary.is_complete);

    let batch = orchestrator.current_snapshot();
    assert_eq!(batch.items()[0].failure_reason(), Some("请求超时"));
    assert!(matches!(batch.items()[1].state(), ItemState::Succeeded(_)));
}

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_submit_folder_to_live_service() {
    ljk_batch_submit::utils::logging::init(true);

    // 需要设置 LJK_EXAM_ID，并在 LJK_INPUT_FOLDER 中放入答题卡图片
    let config = Config::from_env().expect("加载配置失败");

    let summary = ljk_batch_submit::App::initialize(config)
        .expect("初始化失败")
        .run()
        .await
        .expect("运行失败");

    println!(
        "成功 {} / 失败 {} / 共 {}",
        summary.succeeded, summary.failed, summary.total
    );
    assert!(summary.is_complete);
}

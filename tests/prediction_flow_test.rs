use cardio_form::core::page::PREDICT_LABEL;
use cardio_form::core::render::NO_FACTORS_MESSAGE;
use cardio_form::core::view_state::ViewState;
use cardio_form::core::{RenderMode, Storage};
use cardio_form::domain::model::RiskLevel;
use cardio_form::{
    Document, FormController, HttpPredictionClient, LocalStorage, Page, PageLayout, Preset,
    SubmitOutcome,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn controller(base_url: &str, mode: RenderMode, timeout: Duration) -> FormController<HttpPredictionClient> {
    let layout = PageLayout::default();
    let page = Page::bind(&Document::from_layout(&layout), &layout, mode).unwrap();
    let client = HttpPredictionClient::new(base_url, timeout).unwrap();
    FormController::new(client, page, 50)
}

#[tokio::test]
async fn test_low_preset_is_posted_as_json() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/predict")
            .header("content-type", "application/json")
            .json_body(json!({
                "Age": "35",
                "Sex": "F",
                "ChestPainType": "ATA",
                "RestingBP": "115",
                "Cholesterol": "180",
                "FastingBS": "0",
                "RestingECG": "Normal",
                "MaxHR": "172",
                "ExerciseAngina": "N",
                "Oldpeak": "0",
                "ST_Slope": "Up"
            }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "prediction": 0,
                "probability": 6.31,
                "risk_level": "Low",
                "risk_factors": []
            }));
    });

    let controller = controller(&server.base_url(), RenderMode::Gauge, Duration::from_secs(5));
    controller.apply_preset(Preset::Low).unwrap();

    let outcome = controller.submit_prediction().await;
    api_mock.assert();

    match outcome {
        SubmitOutcome::Predicted(prediction) => {
            assert_eq!(prediction.risk_level, RiskLevel::Low);
            assert_eq!(prediction.probability, 6.31);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let page = controller.snapshot();
    assert_eq!(page.view, ViewState::Result);
    assert!(page.factors_list.inner_html.contains(NO_FACTORS_MESSAGE));
    assert!(!page.predict_button.disabled);
}

#[tokio::test]
async fn test_high_risk_renders_factors_in_order() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(200).json_body(json!({
            "prediction": 1,
            "probability": 87.5,
            "risk_level": "High",
            "risk_factors": [
                "High Cholesterol (286.0 mg/dl)",
                "High BP (160.0 mm Hg)",
                "Abnormal ST Slope (Down)"
            ]
        }));
    });

    let controller = controller(&server.base_url(), RenderMode::Gauge, Duration::from_secs(5));
    controller.apply_preset(Preset::High).unwrap();
    controller.submit_prediction().await;

    let page = controller.snapshot();
    assert!(page.risk_label.has_class("risk-high"));
    assert_eq!(page.risk_label.inner_html, "High Risk");
    assert_eq!(page.risk_desc.inner_html, "Medical consultation strongly recommended.");
    assert_eq!(page.gauge_fill.style.get("transform").map(String::as_str), Some("rotate(315deg)"));
    assert_eq!(page.gauge_fill.style.get("border-top-color").map(String::as_str), Some("#ef4444"));

    let html = &page.factors_list.inner_html;
    let cholesterol = html.find("High Cholesterol").unwrap();
    let bp = html.find("High BP").unwrap();
    let slope = html.find("Abnormal ST Slope").unwrap();
    assert!(cholesterol < bp && bp < slope);
}

#[tokio::test]
async fn test_plain_mode_renders_single_container() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(200).json_body(json!({
            "probability": 99,
            "risk_level": "Low",
            "risk_factors": ["Exercise Induced Angina"]
        }));
    });

    let controller = controller(&server.base_url(), RenderMode::Plain, Duration::from_secs(5));
    controller.apply_preset(Preset::Medium).unwrap();
    controller.submit_prediction().await;

    let page = controller.snapshot();
    assert_eq!(page.view, ViewState::Welcome);
    assert!(page.result_state.inner_html.contains("risk-low"));
    assert!(page.result_state.inner_html.contains("<li>Exercise Induced Angina</li>"));
}

#[tokio::test]
async fn test_server_error_status_with_error_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(500).json_body(json!({"error": "Model not loaded."}));
    });

    let controller = controller(&server.base_url(), RenderMode::Gauge, Duration::from_secs(5));
    controller.apply_preset(Preset::High).unwrap();

    let outcome = controller.submit_prediction().await;
    assert_eq!(outcome, SubmitOutcome::Notified("Error: Model not loaded.".to_string()));

    let page = controller.snapshot();
    assert_eq!(page.view, ViewState::Welcome);
    assert!(!page.predict_button.disabled);
}

#[tokio::test]
async fn test_mistyped_probability_is_a_format_mismatch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(200).json_body(json!({
            "probability": "87.5",
            "risk_level": "High",
            "risk_factors": []
        }));
    });

    let controller = controller(&server.base_url(), RenderMode::Gauge, Duration::from_secs(5));
    controller.apply_preset(Preset::High).unwrap();

    let outcome = controller.submit_prediction().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Notified("Unexpected response format from server.".to_string())
    );

    let page = controller.snapshot();
    assert_eq!(page.notice.inner_html, "Unexpected response format from server.");
    assert_eq!(page.view, ViewState::Welcome);
    assert!(!page.predict_button.disabled);
}

#[tokio::test]
async fn test_unreachable_server_restores_button() {
    // Nothing listens on the discard port.
    let controller = controller("http://127.0.0.1:9", RenderMode::Gauge, Duration::from_secs(2));
    controller.apply_preset(Preset::High).unwrap();

    let outcome = controller.submit_prediction().await;
    assert_eq!(outcome, SubmitOutcome::Notified("Connection error.".to_string()));

    let page = controller.snapshot();
    assert!(!page.predict_button.disabled);
    assert_eq!(page.predict_button.inner_html, PREDICT_LABEL);
}

#[tokio::test]
async fn test_hung_request_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(200)
            .delay(Duration::from_secs(2))
            .json_body(json!({"probability": 10, "risk_level": "Low", "risk_factors": []}));
    });

    let controller = controller(&server.base_url(), RenderMode::Gauge, Duration::from_millis(200));
    controller.apply_preset(Preset::Low).unwrap();

    let outcome = controller.submit_prediction().await;
    assert_eq!(outcome, SubmitOutcome::Notified("Connection error.".to_string()));
    assert!(!controller.snapshot().predict_button.disabled);
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_ignored() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(200)
            .delay(Duration::from_millis(300))
            .json_body(json!({"probability": 42, "risk_level": "Low", "risk_factors": []}));
    });

    let controller = controller(&server.base_url(), RenderMode::Gauge, Duration::from_secs(5));
    controller.apply_preset(Preset::Medium).unwrap();

    let (first, second) = tokio::join!(controller.submit_prediction(), controller.submit_prediction());
    let outcomes = [first, second];

    assert_eq!(
        outcomes.iter().filter(|o| matches!(o, SubmitOutcome::Predicted(_))).count(),
        1
    );
    assert_eq!(
        outcomes.iter().filter(|o| matches!(o, SubmitOutcome::Ignored)).count(),
        1
    );
    assert_eq!(api_mock.hits(), 1);
}

#[tokio::test]
async fn test_rendered_page_is_written_to_storage() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(200).json_body(json!({
            "probability": 71.3,
            "risk_level": "High",
            "risk_factors": ["High Fasting Blood Sugar"]
        }));
    });

    let controller = controller(&server.base_url(), RenderMode::Gauge, Duration::from_secs(5));
    controller.apply_preset(Preset::High).unwrap();
    controller.submit_prediction().await;

    let storage = LocalStorage::new(output_path.clone());
    storage
        .write_file("result.html", controller.snapshot().to_html().as_bytes())
        .await
        .unwrap();

    let html = std::fs::read_to_string(std::path::Path::new(&output_path).join("result.html")).unwrap();
    assert!(html.contains("id=\"resultState\" class=\"active\""));
    assert!(html.contains("High Fasting Blood Sugar"));
    assert!(html.contains(">71%<"));
}

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::domain::{RiskAssessment, RiskInput};
use super::validation::ValidationError;
use super::RiskAssessor;
use crate::error::AppError;
use crate::rules::{RuleDescriptor, RuleOutcome};

/// Router builder exposing the scoring and rule endpoints.
pub fn risk_router(assessor: Arc<RiskAssessor>) -> Router {
    Router::new()
        .route("/calculate-risk", post(calculate_risk_handler))
        .route("/explain-rules", post(explain_rules_handler))
        .route("/rules", get(rules_handler))
        .with_state(assessor)
}

/// Validated input, or the client fault that stops it reaching the engines.
fn accept(payload: Result<Json<RiskInput>, JsonRejection>) -> Result<RiskInput, ValidationError> {
    let Json(input) =
        payload.map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;
    input.validate()?;
    Ok(input)
}

pub(crate) async fn calculate_risk_handler(
    State(assessor): State<Arc<RiskAssessor>>,
    payload: Result<Json<RiskInput>, JsonRejection>,
) -> Result<Json<RiskAssessment>, AppError> {
    let input = accept(payload)?;
    let assessment = assessor.assess(&input)?;
    Ok(Json(assessment))
}

pub(crate) async fn explain_rules_handler(
    State(assessor): State<Arc<RiskAssessor>>,
    payload: Result<Json<RiskInput>, JsonRejection>,
) -> Result<Json<Vec<RuleOutcome>>, AppError> {
    let input = accept(payload)?;
    Ok(Json(assessor.explain(&input)))
}

pub(crate) async fn rules_handler(
    State(assessor): State<Arc<RiskAssessor>>,
) -> Json<&'static [RuleDescriptor]> {
    Json(assessor.rule_catalog())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        risk_router(Arc::new(RiskAssessor::new(ScoringConfig::standard())))
    }

    fn post_json(uri: &str, payload: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(payload).expect("serialize")))
            .expect("request builds")
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn calculate_risk_returns_assessment() {
        let response = router()
            .oneshot(post_json(
                "/calculate-risk",
                &json!({ "severity": 80, "confidence": 75, "frequency": 90 }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["risk_score"], json!(81.25));
        assert_eq!(payload["risk_level"], "CRITICAL");
        assert_eq!(payload["breakdown"]["severity"], json!(80.0));
        assert_eq!(
            payload["triggered_rules"],
            json!(["High-severity event detected", "High event frequency detected"])
        );
    }

    #[tokio::test]
    async fn calculate_risk_applies_context() {
        let response = router()
            .oneshot(post_json(
                "/calculate-risk",
                &json!({
                    "severity": 50,
                    "confidence": 50,
                    "frequency": 50,
                    "context": { "failed_logins": 6, "is_privileged": true }
                }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(
            payload["triggered_rules"],
            json!([
                "Multiple failed login attempts",
                "Privileged account activity detected"
            ])
        );
    }

    #[tokio::test]
    async fn calculate_risk_accepts_null_context() {
        let response = router()
            .oneshot(post_json(
                "/calculate-risk",
                &json!({ "severity": 0, "confidence": 0, "frequency": 0, "context": null }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["risk_score"], json!(0.0));
        assert_eq!(payload["risk_level"], "LOW");
        assert_eq!(payload["triggered_rules"], json!([]));
    }

    #[tokio::test]
    async fn client_faults_are_unprocessable() {
        let payloads = [
            json!({ "severity": 80, "confidence": 75 }),
            json!({ "severity": "high", "confidence": 75, "frequency": 90 }),
            json!({ "severity": null, "confidence": 75, "frequency": 90 }),
            json!({ "severity": 150, "confidence": 75, "frequency": 90 }),
            json!({ "severity": -10, "confidence": 75, "frequency": 90 }),
            json!({
                "severity": 10,
                "confidence": 10,
                "frequency": 10,
                "context": { "failed_logins": -1 }
            }),
        ];

        for payload in payloads {
            let response = router()
                .oneshot(post_json("/calculate-risk", &payload))
                .await
                .expect("route executes");
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "payload {payload}"
            );
            let body = read_json_body(response).await;
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn counters_beyond_32_bits_are_scored() {
        let response = router()
            .oneshot(post_json(
                "/calculate-risk",
                &json!({
                    "severity": 10,
                    "confidence": 10,
                    "frequency": 10,
                    "context": { "failed_logins": 5_000_000_000u64, "event_count": 5_000_000_000u64 }
                }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["triggered_rules"], json!(["Multiple failed login attempts"]));
    }

    #[tokio::test]
    async fn out_of_range_message_names_the_field() {
        let response = router()
            .oneshot(post_json(
                "/calculate-risk",
                &json!({ "severity": 50, "confidence": 50, "frequency": 101 }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json_body(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .starts_with("frequency"));
    }

    #[tokio::test]
    async fn explain_rules_lists_every_outcome() {
        let response = router()
            .oneshot(post_json(
                "/explain-rules",
                &json!({ "severity": 75, "confidence": 40, "frequency": 50 }),
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        let outcomes = payload.as_array().expect("array of outcomes");
        assert_eq!(outcomes.len(), 5);
        assert_eq!(
            outcomes[4]["rule_name"],
            "Low confidence with high severity"
        );
        assert_eq!(outcomes[4]["triggered"], true);
        assert_eq!(outcomes[0]["triggered"], false);
    }

    #[tokio::test]
    async fn rules_endpoint_lists_catalog_in_order() {
        let response = router()
            .oneshot(
                Request::get("/rules")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        let names: Vec<&str> = payload
            .as_array()
            .expect("array of rules")
            .iter()
            .filter_map(|rule| rule["name"].as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Multiple failed login attempts",
                "High-severity event detected",
                "Privileged account activity detected",
                "High event frequency detected",
                "Low confidence with high severity"
            ]
        );
    }
}

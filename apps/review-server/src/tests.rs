//! Tests for the review server API
//!
//! Test categories:
//! - Property tests over the review response shape
//! - HTTP endpoint tests using axum-test with a stubbed text generator

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use review_engine::ReviewEngine;
    use shared_types::DocumentSet;

    use crate::api::ReviewResponse;

    /// Korean-only sentences, which the default policy always accepts
    fn korean_text() -> impl Strategy<Value = String> {
        "[가-힣 ]{1,40}\\."
    }

    /// Text mixing Hangul, ASCII letters and a few symbols
    fn mixed_text() -> impl Strategy<Value = String> {
        "[가-힣a-zA-Z &!?.,]{0,60}"
    }

    proptest! {
        /// Property: every record lands in exactly one bucket
        #[test]
        fn counts_cover_every_record(texts in prop::collection::vec(mixed_text(), 1..6)) {
            let documents: DocumentSet = texts
                .iter()
                .enumerate()
                .map(|(i, t)| (format!("record_{}.pdf", i), t.clone()))
                .collect();

            let response = ReviewResponse::from_outcome(&ReviewEngine::new().review(&documents));

            prop_assert_eq!(response.clean_count + response.flagged_count, documents.len());
            prop_assert_eq!(response.clean.len(), response.clean_count);
            prop_assert_eq!(response.flagged.len(), response.flagged_count);
        }

        /// Property: a single Korean-only record always passes
        #[test]
        fn korean_only_record_passes(text in korean_text()) {
            let documents: DocumentSet = [("solo.pdf", text)].into_iter().collect();

            let response = ReviewResponse::from_outcome(&ReviewEngine::new().review(&documents));

            prop_assert_eq!(response.clean, vec!["solo.pdf".to_string()]);
            prop_assert!(response.duplicates.is_empty());
        }

        /// Property: duplicate percentages are rendered as "<n>%" with n in 95..=100
        #[test]
        fn duplicate_percentages_in_range(text in korean_text()) {
            let documents: DocumentSet = [("a.pdf", text.clone()), ("b.pdf", text)]
                .into_iter()
                .collect();

            let response = ReviewResponse::from_outcome(&ReviewEngine::new().review(&documents));

            prop_assert_eq!(response.duplicates.len(), 1);
            let pct = response.duplicates[0].percentage.trim_end_matches('%');
            let value: u8 = pct.parse().unwrap();
            prop_assert!((95..=100).contains(&value));
        }
    }
}

#[cfg(test)]
mod http_endpoint_tests {
    //! HTTP endpoint integration tests using axum-test

    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use base64::Engine;
    use correction_client::{CorrectionConfig, CorrectionError, GenerationRequest, TextGenerator};
    use review_engine::ReviewEngine;
    use serde_json::json;

    use crate::{build_router, AppState};

    /// Canned generator that records the keys it was called with
    struct StubGenerator {
        reply: Result<String, (u16, Option<u64>)>,
        keys: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                keys: Mutex::new(Vec::new()),
            })
        }

        fn unavailable(status: u16, retry_after_secs: Option<u64>) -> Arc<Self> {
            Arc::new(Self {
                reply: Err((status, retry_after_secs)),
                keys: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.keys.lock().unwrap().clone()
        }
    }

    impl TextGenerator for StubGenerator {
        fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, CorrectionError> {
            self.keys.lock().unwrap().push(request.api_key.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, retry_after_secs)) => Err(CorrectionError::Unavailable {
                    status: *status,
                    retry_after_secs: *retry_after_secs,
                }),
            }
        }
    }

    /// Create a test server with the full router
    fn create_test_server(
        correction: CorrectionConfig,
        generator: Arc<StubGenerator>,
    ) -> TestServer {
        let state = AppState {
            engine: Arc::new(ReviewEngine::new()),
            correction,
            generator,
        };

        TestServer::new(build_router(state)).unwrap()
    }

    fn default_server() -> TestServer {
        create_test_server(CorrectionConfig::default(), StubGenerator::replying("unused"))
    }

    #[tokio::test]
    async fn test_health_returns_200() {
        let server = default_server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "review-server");
    }

    #[tokio::test]
    async fn test_policy_lists_default_allow_list() {
        let server = default_server();
        let response = server.get("/api/policy").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["duplicate_threshold"], 0.95);

        let allowed: Vec<&str> = json["allowed_english"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(allowed.contains(&"cm"));
        assert!(allowed.contains(&"PPT"));
    }

    #[tokio::test]
    async fn test_review_flags_english_and_symbols() {
        let server = default_server();

        let response = server
            .post("/api/review")
            .json(&json!({
                "documents": [
                    { "name": "lee.pdf", "text": "He loves coding & math!" },
                    { "name": "kim.pdf", "text": "학생은 IT 분야에 관심이 있음." }
                ]
            }))
            .await;

        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["clean"], json!(["kim.pdf"]));
        assert_eq!(json["flagged_count"], 1);

        let flagged = &json["flagged"][0];
        assert_eq!(flagged["name"], "lee.pdf");
        assert_eq!(
            flagged["illegal_english"],
            json!(["He", "coding", "loves", "math"])
        );
        assert_eq!(flagged["illegal_symbols"], json!(["!", "&"]));
        assert_eq!(flagged["duplicate"], false);
        assert_eq!(flagged["text"], "He loves coding & math!");
    }

    #[tokio::test]
    async fn test_review_flags_identical_records() {
        let server = default_server();
        let text = "수학 동아리에서 확률 단원을 탐구하고 발표함.";

        let response = server
            .post("/api/review")
            .json(&json!({
                "documents": [
                    { "name": "a.pdf", "text": text },
                    { "name": "b.pdf", "text": text },
                    { "name": "c.pdf", "text": "체육 대회에서 학급 대표로 참가함." }
                ]
            }))
            .await;

        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["clean"], json!(["c.pdf"]));
        assert_eq!(
            json["duplicates"],
            json!([{ "first": "a.pdf", "second": "b.pdf", "percentage": "100%" }])
        );
        assert_eq!(json["flagged"][0]["duplicate"], true);
        assert_eq!(
            json["flagged"][0]["duplicate_of"],
            json!([{ "name": "b.pdf", "percentage": "100%" }])
        );
    }

    #[tokio::test]
    async fn test_review_rejects_empty_batch() {
        let server = default_server();

        let response = server
            .post("/api/review")
            .json(&json!({ "documents": [] }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_review_rejects_unreadable_pdf() {
        let server = default_server();
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"not a pdf at all");

        let response = server
            .post("/api/review")
            .json(&json!({
                "documents": [ { "name": "scan.pdf", "pdf_base64": encoded } ]
            }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert!(json["error"].as_str().unwrap().contains("scan.pdf"));
    }

    #[tokio::test]
    async fn test_review_skips_unreadable_pdf_and_reviews_the_rest() {
        let server = default_server();
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"not a pdf at all");

        let response = server
            .post("/api/review")
            .json(&json!({
                "documents": [
                    { "name": "good.pdf", "text": "He loves coding & math!" },
                    { "name": "bad.pdf", "pdf_base64": encoded }
                ]
            }))
            .await;

        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["flagged_count"], 1);
        assert_eq!(json["flagged"][0]["name"], "good.pdf");
        assert_eq!(json["clean_count"], 0);
        assert_eq!(json["failed"][0]["name"], "bad.pdf");
        assert!(!json["failed"][0]["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_correct_without_key_is_412() {
        let generator = StubGenerator::replying("unused");
        let server = create_test_server(CorrectionConfig::default(), generator.clone());

        let response = server
            .post("/api/correct")
            .json(&json!({ "text": "He loves coding & math!" }))
            .await;

        response.assert_status(StatusCode::PRECONDITION_FAILED);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "MISSING_CREDENTIAL");
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_correct_with_request_key() {
        let generator = StubGenerator::replying("코딩과 수학을 좋아함.");
        let server = create_test_server(CorrectionConfig::default(), generator.clone());

        let response = server
            .post("/api/correct")
            .json(&json!({
                "name": "lee.pdf",
                "text": "He loves coding & math!",
                "api_key": "request-key"
            }))
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["success"], true);
        assert_eq!(json["name"], "lee.pdf");
        assert_eq!(json["corrected_text"], "코딩과 수학을 좋아함.");
        assert_eq!(generator.calls(), vec!["request-key".to_string()]);
    }

    #[tokio::test]
    async fn test_correct_uses_server_key_when_request_has_none() {
        let generator = StubGenerator::replying("수정됨.");
        let server = create_test_server(
            CorrectionConfig::default().with_api_key("server-key"),
            generator.clone(),
        );

        let response = server
            .post("/api/correct")
            .json(&json!({ "text": "본문", "api_key": "  " }))
            .await;

        response.assert_status_ok();
        assert_eq!(generator.calls(), vec!["server-key".to_string()]);
    }

    #[tokio::test]
    async fn test_correct_rate_limited_is_retry_later() {
        let generator = StubGenerator::unavailable(429, Some(30));
        let server = create_test_server(
            CorrectionConfig::default().with_api_key("server-key"),
            generator.clone(),
        );

        let response = server
            .post("/api/correct")
            .json(&json!({ "text": "본문" }))
            .await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.header("retry-after"), "30");
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "RETRY_LATER");
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_correct_service_unavailable_is_retry_later() {
        let generator = StubGenerator::unavailable(503, None);
        let server = create_test_server(
            CorrectionConfig::default().with_api_key("server-key"),
            generator,
        );

        let response = server
            .post("/api/correct")
            .json(&json!({ "text": "본문" }))
            .await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["code"], "RETRY_LATER");
    }
}

#[cfg(test)]
mod serve_config_tests {
    use crate::body_limit_bytes;

    #[test]
    fn test_body_limit_in_bytes() {
        assert_eq!(body_limit_bytes(25), 25 * 1024 * 1024);
    }

    #[test]
    fn test_body_limit_saturates() {
        assert_eq!(body_limit_bytes(usize::MAX), usize::MAX);
    }
}

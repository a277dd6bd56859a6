//! Tests for `ApiClient` request building and failure classification.

use super::test_fixtures::{MockClient, json_response, response_with_type};
use super::{
    ApiClient, ApiMethod, CallError, HttpError, HttpRequest, SetupError, base_url_for_domain,
};
use http::StatusCode;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

fn api(client: MockClient) -> ApiClient<MockClient> {
    ApiClient::for_domain(client, "demo.example.com", "secret").unwrap()
}

mod setup {
    use super::*;

    #[test]
    fn base_url_for_domain_builds_v2_path() {
        let url = base_url_for_domain("demo.example.com").unwrap();

        assert_eq!(url.as_str(), "https://demo.example.com/api/bot/v2/");
    }

    #[test]
    fn base_url_for_domain_rejects_garbage() {
        let err = base_url_for_domain("bad domain").unwrap_err();

        assert!(matches!(err, SetupError::InvalidDomain { .. }));
    }

    #[test]
    fn new_rejects_token_with_newline() {
        let base = base_url_for_domain("demo.example.com").unwrap();
        let err = ApiClient::new(MockClient::new(), base, "bad\ntoken").unwrap_err();

        assert!(matches!(err, SetupError::InvalidToken(_)));
    }

    #[test]
    fn method_url_appends_method_name() {
        let api = api(MockClient::new());

        assert_eq!(
            api.method_url(ApiMethod::SendMessage).as_str(),
            "https://demo.example.com/api/bot/v2/send_message"
        );
        assert_eq!(
            api.method_url(ApiMethod::RedirectChat).as_str(),
            "https://demo.example.com/api/bot/v2/redirect_chat"
        );
    }

    #[test]
    fn method_url_works_without_trailing_slash() {
        let base = url::Url::parse("http://127.0.0.1:9000/bot").unwrap();
        let api = ApiClient::new(MockClient::new(), base, "t").unwrap();

        assert_eq!(
            api.method_url(ApiMethod::CloseChat).as_str(),
            "http://127.0.0.1:9000/bot/close_chat"
        );
    }
}

mod request_building {
    use super::*;

    #[tokio::test]
    async fn sends_json_post_with_token_header() {
        let api = api(MockClient::new());

        api.try_call(ApiMethod::CloseChat, &json!({"chat_id": "c1"}))
            .await
            .unwrap();

        let requests = api_requests(&api);
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, http::Method::POST);
        assert_eq!(
            req.url.as_str(),
            "https://demo.example.com/api/bot/v2/close_chat"
        );
        assert_eq!(req.headers[AUTHORIZATION], "Token secret");
        assert_eq!(req.headers[CONTENT_TYPE], "application/json");
        assert_eq!(req.body.as_deref(), Some(br#"{"chat_id":"c1"}"#.as_slice()));
    }

    fn api_requests(api: &ApiClient<MockClient>) -> Vec<HttpRequest> {
        api.client().captured_requests()
    }
}

mod classification {
    use super::*;

    #[tokio::test]
    async fn success_returns_parsed_body() {
        let api = api(MockClient::new());

        let body = api
            .try_call(ApiMethod::SendMessage, &json!({}))
            .await
            .unwrap();

        assert_eq!(body, json!({"result": "ok"}));
    }

    #[tokio::test]
    async fn transport_failure() {
        let api = api(MockClient::with_responses(vec![Err(HttpError::Timeout)]));

        let err = api
            .try_call(ApiMethod::SendMessage, &json!({}))
            .await
            .unwrap_err();

        match err {
            CallError::Transport { url, source } => {
                assert!(url.as_str().ends_with("/send_message"));
                assert!(matches!(source, HttpError::Timeout));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_content_type() {
        let api = api(MockClient::with_responses(vec![Ok(response_with_type(
            StatusCode::BAD_GATEWAY,
            "text/html",
            "<h1>Bad gateway</h1>",
        ))]));

        let err = api
            .try_call(ApiMethod::SendMessage, &json!({}))
            .await
            .unwrap_err();

        match err {
            CallError::UnexpectedContentType {
                status,
                content_type,
                ..
            } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(content_type.as_deref(), Some("text/html"));
            }
            other => panic!("expected content type error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_keeps_raw_text() {
        let api = api(MockClient::with_responses(vec![Ok(json_response(
            StatusCode::OK,
            "{not json",
        ))]));

        let err = api
            .try_call(ApiMethod::SendMessage, &json!({}))
            .await
            .unwrap_err();

        match err {
            CallError::MalformedBody { text, .. } => assert_eq!(text, "{not json"),
            other => panic!("expected malformed body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_field_with_non_2xx_is_application_error() {
        let api = api(MockClient::with_responses(vec![Ok(json_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"chat_not_found","desc":"No such chat"}"#,
        ))]));

        let err = api
            .try_call(ApiMethod::CloseChat, &json!({"chat_id": "c1"}))
            .await
            .unwrap_err();

        match err {
            CallError::Application {
                status,
                code,
                description,
                ..
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(code, "chat_not_found");
                assert_eq!(description.as_deref(), Some("No such chat"));
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_field_with_200_is_application_error() {
        let api = api(MockClient::with_responses(vec![Ok(json_response(
            StatusCode::OK,
            r#"{"error":"invalid_token"}"#,
        ))]));

        let err = api
            .try_call(ApiMethod::SendMessage, &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, CallError::Application { ref code, .. } if code == "invalid_token"));
    }

    #[tokio::test]
    async fn error_field_survives_both_description_keys() {
        let api = api(MockClient::with_responses(vec![Ok(json_response(
            StatusCode::OK,
            r#"{"error":"chat_not_found","desc":"a","description":"b"}"#,
        ))]));

        let err = api
            .try_call(ApiMethod::CloseChat, &json!({"chat_id": "c1"}))
            .await
            .unwrap_err();

        match err {
            CallError::Application {
                code, description, ..
            } => {
                assert_eq!(code, "chat_not_found");
                assert_eq!(description.as_deref(), Some("a"));
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_field_survives_non_string_description() {
        let api = api(MockClient::with_responses(vec![Ok(json_response(
            StatusCode::OK,
            r#"{"error":"chat_not_found","description":{"en":"gone"}}"#,
        ))]));

        let err = api
            .try_call(ApiMethod::CloseChat, &json!({"chat_id": "c1"}))
            .await
            .unwrap_err();

        match err {
            CallError::Application {
                code, description, ..
            } => {
                assert_eq!(code, "chat_not_found");
                assert_eq!(description, None);
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_2xx_without_error_field_is_application_error() {
        let api = api(MockClient::with_responses(vec![Ok(json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "{}",
        ))]));

        let err = api
            .try_call(ApiMethod::SendMessage, &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, CallError::Application { ref code, .. } if code == "unknown"));
    }

    #[tokio::test]
    async fn null_or_empty_error_field_is_success() {
        let api = api(MockClient::with_responses(vec![
            Ok(json_response(StatusCode::OK, r#"{"error":null}"#)),
            Ok(json_response(StatusCode::OK, r#"{"error":""}"#)),
        ]));

        assert!(api.try_call(ApiMethod::SendMessage, &json!({})).await.is_ok());
        assert!(api.try_call(ApiMethod::SendMessage, &json!({})).await.is_ok());
    }

    #[test]
    fn application_error_display_includes_description() {
        let err = CallError::Application {
            url: url::Url::parse("https://demo.example.com/api/bot/v2/close_chat").unwrap(),
            status: StatusCode::BAD_REQUEST,
            code: "chat_not_found".to_string(),
            description: Some("No such chat".to_string()),
        };

        let text = err.to_string();
        assert!(text.contains("chat_not_found (No such chat)"));
        assert!(text.contains("close_chat"));
    }
}

mod best_effort_call {
    use super::*;

    #[tokio::test]
    async fn call_swallows_errors_and_next_call_proceeds() {
        let api = api(MockClient::with_responses(vec![
            Ok(json_response(
                StatusCode::BAD_REQUEST,
                r#"{"error":"chat_not_found"}"#,
            )),
            Err(HttpError::Timeout),
        ]));

        api.call(ApiMethod::SendMessage, &json!({"n": 1})).await;
        api.call(ApiMethod::SendMessage, &json!({"n": 2})).await;
        api.call(ApiMethod::CloseChat, &json!({"n": 3})).await;

        let calls = api.client().calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], ("close_chat".to_string(), json!({"n": 3})));
    }
}

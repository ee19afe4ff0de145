use exchange_apis::core::kernel::{PreparedRequest, ReqwestRest, RestClient, RestClientConfig, RetryPolicy};
use exchange_apis::{ExchangeError, HttpMethod, Params};
use mockito::Matcher;
use serde_json::{json, Value};
use std::time::Duration;

fn rest(max_attempts: u32) -> ReqwestRest {
    let policy = RetryPolicy::default()
        .with_max_attempts(max_attempts)
        .with_backoff_base(Duration::from_millis(10));
    ReqwestRest::new(RestClientConfig::new("test".to_string()).with_retry_policy(policy))
}

fn get(url: String) -> PreparedRequest {
    PreparedRequest {
        method: HttpMethod::Get,
        url,
        params: Params::new(),
        headers: Vec::new(),
        body: Vec::new(),
    }
}

#[cfg(test)]
mod executor_tests {
    use super::*;

    #[tokio::test]
    async fn test_retryable_status_is_attempted_exactly_max_attempts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/flaky")
            .with_status(503)
            .with_body("Service Unavailable")
            .expect(3)
            .create_async()
            .await;

        let result = rest(3).execute(&get(format!("{}/flaky", server.url()))).await;

        mock.assert_async().await;
        match result {
            Err(ExchangeError::Http { status, message, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_429_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/busy")
            .with_status(429)
            .with_body(r#"{"message":"slow down"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = rest(4)
            .execute(&get(format!("{}/busy", server.url())))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.message(), "slow down");
        assert!(err.to_string().contains("returned status code 429 with message: slow down"));
    }

    #[tokio::test]
    async fn test_bad_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/badjson")
            .with_status(200)
            .with_body("[']")
            .create_async()
            .await;

        let err = rest(1)
            .execute(&get(format!("{}/badjson", server.url())))
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::Decode { status: 200, .. }));
        assert!(err.to_string().contains("Could not decode JSON response"));
    }

    #[tokio::test]
    async fn test_empty_body_decodes_to_null() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/order")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let mut request = get(format!("{}/order", server.url()));
        request.method = HttpMethod::Delete;

        assert_eq!(rest(1).execute(&request).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_query_and_body_go_out_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/x")
            // lists go out as repeated keys, in order
            .match_query(Matcher::Exact(
                "param=data+and+%3C%2C+stuff&symbols=A&symbols=B".into(),
            ))
            .match_header("Content-Type", "application/json")
            .match_body(r#"{"one":1,"two":[1,2]}"#)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let request = PreparedRequest {
            method: HttpMethod::Post,
            url: format!("{}/x", server.url()),
            params: Params::new()
                .with("param", "data and <, stuff")
                .with_list("symbols", ["A", "B"]),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(&json!({"one": 1, "two": [1, 2]})).unwrap(),
        };

        assert_eq!(rest(1).execute(&request).await.unwrap(), json!([]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_with_body_is_rejected_before_sending() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", "/x").expect(0).create_async().await;

        let mut request = get(format!("{}/x", server.url()));
        request.body = b"{}".to_vec();

        assert!(matches!(
            rest(1).execute(&request).await,
            Err(ExchangeError::InvalidParameters(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_error_has_no_status() {
        let err = rest(2)
            .execute(&get("http://127.0.0.1:1/unreachable".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::Connection { .. }));
        assert!(err.is_transient());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.url(), Some("http://127.0.0.1:1/unreachable"));
    }

    #[tokio::test]
    async fn test_html_error_page_is_classified() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/html")
            .with_status(403)
            .with_header("content-type", "text/html")
            .with_body("blah blah <title>Invalid Request</title>blah")
            .create_async()
            .await;

        let err = rest(1)
            .execute(&get(format!("{}/html", server.url())))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "HTML: Invalid Request");
    }
}

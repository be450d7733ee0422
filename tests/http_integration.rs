//! Integration tests for HAL navigation over HTTP using wiremock
//!
//! These tests drive `HttpHalClient` and `Resource` against mocked
//! endpoints: request headers, link following, templated links and the
//! error cases a caller can observe.

use halnav::client::http::DEFAULT_ACCEPT;
use halnav::{FetchError, Hal, HalError, HttpHalClient, HttpOptions, Variables};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn hal_for(options: &HttpOptions) -> Hal {
    Hal::new(HttpHalClient::with_options(options).expect("client should build"))
}

fn default_hal() -> Hal {
    hal_for(&HttpOptions::default())
}

/// Test module for navigation over a mocked HAL API
mod navigation_tests {
    use super::*;

    /// Root document with embedded items and a next link
    #[tokio::test]
    async fn test_embedded_items_and_single_follow() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_links": {
                    "self": {"href": "/"},
                    "next": {"href": "/p2"}
                },
                "_embedded": {
                    "item": [{"name": "a"}, {"name": "b"}]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": 2})))
            .expect(1)
            .mount(&server)
            .await;

        let hal = default_hal();
        let root = hal
            .load(&format!("{}/", server.uri()))
            .await
            .expect("root should load");

        let items = root.embedded("item").expect("items should be embedded");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].prop("name"), Some(&json!("a")));
        assert_eq!(items[1].prop("name"), Some(&json!("b")));

        let next = root
            .follow("next", &Variables::new())
            .await
            .expect("next should load");
        assert_eq!(next.prop("page"), Some(&json!(2)));
        assert_eq!(next.base_url(), format!("{}/p2", server.uri()));
    }

    /// The client asks for HAL or plain JSON by default
    #[tokio::test]
    async fn test_default_accept_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(|req: &Request| {
                req.headers
                    .get("accept")
                    .and_then(|v| v.to_str().ok())
                    == Some(DEFAULT_ACCEPT)
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let root = default_hal()
            .load(&format!("{}/", server.uri()))
            .await
            .expect("root should load");
        assert_eq!(root.prop("ok"), Some(&json!(true)));
    }

    /// Configured accept and user agent headers are sent
    #[tokio::test]
    async fn test_configured_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("accept", "application/hal+json"))
            .and(header("user-agent", "halnav-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let options = HttpOptions {
            user_agent: "halnav-test/1.0".to_string(),
            accept: "application/hal+json".to_string(),
            timeout: None,
        };
        hal_for(&options)
            .load(&format!("{}/", server.uri()))
            .await
            .expect("root should load");
    }

    /// A caller-built reqwest client keeps its default headers
    #[tokio::test]
    async fn test_wrapped_reqwest_client() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_static("Bearer test-token"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("client should build");

        let root = Hal::new(HttpHalClient::from_client(client))
            .load(&format!("{}/", server.uri()))
            .await
            .expect("root should load");
        assert_eq!(root.prop("ok"), Some(&json!(true)));
    }

    /// Templated link expands path variables before joining
    #[tokio::test]
    async fn test_templated_path_follow() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_links": {"ht:me": {"href": "/users/{name}", "templated": true}}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/clanie"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"real_name": "Clanie"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let root = default_hal()
            .load(&server.uri())
            .await
            .expect("root should load");
        let user = root
            .follow("ht:me", &Variables::new().with("name", "clanie"))
            .await
            .expect("user should load");

        assert_eq!(user.prop("real_name"), Some(&json!("Clanie")));
    }

    /// Templated query expansion lands in the query string
    #[tokio::test]
    async fn test_templated_query_follow() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_links": {"posts": {"href": "posts{?page,size}", "templated": true}}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": 2})))
            .expect(1)
            .mount(&server)
            .await;

        let root = default_hal()
            .load(&format!("{}/api", server.uri()))
            .await
            .expect("root should load");
        let posts = root
            .follow("posts", &Variables::new().with("page", 2u32))
            .await
            .expect("posts should load");

        assert_eq!(posts.prop("page"), Some(&json!(2)));
    }

    /// Absolute links go to their own host
    #[tokio::test]
    async fn test_absolute_link_to_other_server() {
        let api = MockServer::start().await;
        let other = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_links": {"elsewhere": {"href": format!("{}/x", other.uri())}}
            })))
            .mount(&api)
            .await;

        Mock::given(method("GET"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"here": true})))
            .expect(1)
            .mount(&other)
            .await;

        let root = default_hal()
            .load(&format!("{}/", api.uri()))
            .await
            .expect("root should load");
        let x = root
            .follow("elsewhere", &Variables::new())
            .await
            .expect("other server should answer");
        assert_eq!(x.prop("here"), Some(&json!(true)));
    }

    /// Refresh fetches self again and yields the same properties
    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_links": {"self": {"href": "/users/1"}},
                "name": "one"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let user = default_hal()
            .load(&format!("{}/users/1", server.uri()))
            .await
            .expect("user should load");
        let refreshed = user.refresh().await.expect("refresh should load");

        assert_eq!(refreshed.prop("name"), user.prop("name"));
        assert_eq!(refreshed.base_url(), user.base_url());
    }

    /// Embedded partial resource upgraded to its full representation
    #[tokio::test]
    async fn test_full_representation_of_embedded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/posts/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": {"ht:post": [
                    {"_links": {"self": {"href": "/posts/1"}}, "summary": "short"}
                ]}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/posts/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_links": {"self": {"href": "/posts/1"}},
                "content": "the whole post"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let latest = default_hal()
            .load(&format!("{}/posts/latest", server.uri()))
            .await
            .expect("latest should load");
        let post = &latest.embedded("ht:post").expect("posts embedded")[0];
        assert!(post.prop("content").is_none());

        let full = post.full().await.expect("full post should load");
        assert_eq!(full.prop("content"), Some(&json!("the whole post")));
    }
}

/// Test module for failures surfaced to the caller
mod error_tests {
    use super::*;

    /// Test 404 response becomes a status fetch error
    #[tokio::test]
    async fn test_404_is_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Not found"}
            })))
            .mount(&server)
            .await;

        let err = default_hal()
            .load(&format!("{}/missing", server.uri()))
            .await
            .expect_err("404 should fail");

        assert!(matches!(
            err,
            HalError::Fetch(FetchError::Status { status: 404, .. })
        ));
    }

    /// Test a broken body is reported as invalid JSON
    #[tokio::test]
    async fn test_invalid_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let err = default_hal()
            .load(&format!("{}/", server.uri()))
            .await
            .expect_err("html should fail");

        assert!(matches!(err, HalError::Fetch(FetchError::InvalidJson { .. })));
    }

    /// Test a scalar inside _embedded fails the whole load
    #[tokio::test]
    async fn test_malformed_embedded_fails_load() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": {"item": [{"name": "a"}, 5]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = default_hal()
            .load(&format!("{}/", server.uri()))
            .await
            .expect_err("scalar embedded entry should fail");

        assert!(matches!(err, HalError::MalformedEmbedded { .. }));
    }

    /// Test failure of a followed link propagates
    #[tokio::test]
    async fn test_follow_failure_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_links": {"broken": {"href": "/broken"}}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let root = default_hal()
            .load(&format!("{}/", server.uri()))
            .await
            .expect("root should load");
        let err = root
            .follow("broken", &Variables::new())
            .await
            .expect_err("500 should fail");

        assert!(matches!(
            err,
            HalError::Fetch(FetchError::Status { status: 500, .. })
        ));
    }

    /// Test a missing relation makes no request
    #[tokio::test]
    async fn test_missing_rel_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_links": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let root = default_hal()
            .load(&format!("{}/", server.uri()))
            .await
            .expect("root should load");
        let err = root
            .follow("missing-rel", &Variables::new())
            .await
            .expect_err("missing rel should fail");

        assert_eq!(err.rel(), Some("missing-rel"));
    }

    /// Test client timeout surfaces as a transport error
    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let options = HttpOptions {
            timeout: Some(Duration::from_millis(100)),
            ..HttpOptions::default()
        };
        let err = hal_for(&options)
            .load(&format!("{}/slow", server.uri()))
            .await
            .expect_err("slow response should time out");

        assert!(matches!(err, HalError::Fetch(FetchError::Transport { .. })));
    }
}

use crate::utils::{expect_fails_with, get, init_logging, post};
use httpfake::prelude::*;
use std::{collections::HashSet, sync::Arc};

async fn handler_with_traffic() -> FakeHandler {
    let handler = FakeHandler::new(StatusCodeResponse::new(StatusCode::OK));

    let requests = vec![
        get("https://api.example.com/users?page=1"),
        get("https://api.example.com/users?page=2"),
        post(
            "https://api.example.com/users",
            "application/json",
            r#"{"name":"Ada"}"#,
        ),
        http::Request::delete("http://localhost:8080/users/7")
            .header("authorization", "Bearer secret")
            .body(Bytes::new())
            .unwrap(),
    ];

    for req in requests {
        handler.send(req).await.unwrap();
    }

    handler
}

#[tokio::test]
async fn counts_requests_by_uri_pattern() {
    init_logging();

    // Arrange
    let handler = handler_with_traffic().await;

    // Assert
    handler.should_have_made_requests().times(4);
    handler
        .should_have_made_requests_to("https://api.example.com/users")
        .unwrap()
        .times(3);
    handler
        .should_have_made_requests_to("*/users?page=*")
        .unwrap()
        .times(2);
    handler
        .should_have_made_requests_to("*:8080/users/*")
        .unwrap()
        .once();
    handler
        .should_have_made_requests_to("https://*.example.com/orders")
        .unwrap()
        .never();
    handler.should_have_made_requests_to("*").unwrap().at_least(3);
}

#[tokio::test]
async fn filters_by_method_header_and_content() {
    let handler = handler_with_traffic().await;

    handler
        .should_have_made_requests_to("*/users")
        .unwrap()
        .with_method(Method::POST)
        .with_header("content-type", "application/*")
        .unwrap()
        .with_content_pattern(r#"*"name":*"#)
        .unwrap()
        .once();

    handler
        .should_have_made_requests()
        .with_method_str("delete")
        .unwrap()
        .with_header("Authorization", "bearer *")
        .unwrap()
        .once();

    handler
        .should_have_made_requests()
        .with_method(Method::GET)
        .with_headers_absent()
        .times(2);

    let matching = handler
        .should_have_made_requests()
        .with_content(r#"{"name":"Ada"}"#)
        .matching_requests();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].method(), &Method::POST);
}

#[tokio::test]
async fn strict_options_compare_case() {
    let handler = handler_with_traffic().await;

    handler
        .should_have_made_requests_to("HTTPS://API.EXAMPLE.COM/USERS")
        .unwrap()
        .times(3);
    handler
        .should_have_made_requests_to("HTTPS://API.EXAMPLE.COM/USERS")
        .unwrap()
        .with_options(MatchOptions::strict())
        .never();

    let strict = FakeHandler::new(StatusCodeResponse::new(StatusCode::OK))
        .with_options(MatchOptions::default().with_path_case_insensitive(false));
    strict.send(get("https://api.example.com/Users")).await.unwrap();
    strict
        .should_have_made_requests_to("*/users")
        .unwrap()
        .never();
}

#[tokio::test]
async fn failure_names_the_closest_request() {
    let handler = handler_with_traffic().await;

    expect_fails_with(
        &[
            "Expected exactly 1 request(s) matching",
            "https://api.example.com/user",
            "but 0 of 4 captured request(s) matched.",
            "The closest request was POST https://api.example.com/users",
            "(mismatched: path).",
        ],
        || {
            handler
                .should_have_made_requests_to("https://api.example.com/user")
                .unwrap()
                .with_method(Method::POST)
                .once()
        },
    );

    expect_fails_with(
        &["Expected at least 5 request(s)", "but 4 of 4 captured request(s) matched."],
        || handler.should_have_made_requests().at_least(5),
    );
}

#[tokio::test]
async fn failure_without_captured_requests() {
    let handler = FakeHandler::new(StatusCodeResponse::new(StatusCode::OK));

    expect_fails_with(
        &["but 0 of 0 captured request(s) matched.", "No requests have been captured."],
        || handler.should_have_made_requests_to("*/users").unwrap().once(),
    );

    handler.send(get("https://api.example.com/users")).await.unwrap();
    expect_fails_with(&["Expected exactly 0 request(s)"], || {
        handler.should_not_have_made_requests()
    });

    handler.reset();
    handler.should_not_have_made_requests();
}

#[test]
fn invalid_assertion_patterns_are_errors() {
    let handler = FakeHandler::new(StatusCodeResponse::new(StatusCode::OK));

    assert!(handler.should_have_made_requests_to("").is_err());
    assert!(handler.should_have_made_requests_to("localhost:80x/").is_err());
    assert!(handler
        .should_have_made_requests()
        .with_method_str("GE T")
        .is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn captures_requests_sent_from_many_threads() {
    let handler = Arc::new(FakeHandler::new(StatusCodeResponse::new(StatusCode::OK)));

    let tasks: Vec<_> = (0..64)
        .map(|idx| {
            let handler = handler.clone();
            tokio::spawn(async move {
                let uri = format!("https://api.example.com/items/{}", idx);
                handler.send(get(&uri)).await.unwrap();
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    handler.should_have_made_requests().times(64);
    handler
        .should_have_made_requests_to("https://api.example.com/items/*")
        .unwrap()
        .times(64);

    let uris: HashSet<String> = handler
        .captured_requests()
        .iter()
        .map(|req| req.uri().to_string())
        .collect();
    assert_eq!(uris.len(), 64);
}

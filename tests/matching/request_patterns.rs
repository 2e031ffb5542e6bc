use bytes::Bytes;
use http::{Method, Version};
use httpfake::{CapturedRequest, MatchOptions, RequestPattern, UriPattern, Value};

fn capture(req: http::Request<Bytes>) -> CapturedRequest {
    CapturedRequest::try_from(req).unwrap()
}

#[test]
fn request_pattern_table_test() {
    struct TestData {
        pattern: RequestPattern,
        request: http::Request<Bytes>,
        expected: bool,
    }

    let json_post = || {
        http::Request::post("https://api.example.com/users")
            .header("content-type", "application/json")
            .header("authorization", "Bearer token-1")
            .body(Bytes::from(r#"{"name":"Ada"}"#))
            .unwrap()
    };

    let tests = vec![
        TestData {
            pattern: RequestPattern::default(),
            request: json_post(),
            expected: true,
        },
        TestData {
            pattern: RequestPattern {
                method: Value::exact(Method::POST),
                request_uri: "https://*.example.com/users".parse().unwrap(),
                ..RequestPattern::default()
            },
            request: json_post(),
            expected: true,
        },
        TestData {
            pattern: RequestPattern {
                method: Value::one_of([Method::PUT, Method::PATCH]),
                ..RequestPattern::default()
            },
            request: json_post(),
            expected: false,
        },
        TestData {
            pattern: RequestPattern {
                headers: vec![
                    (Value::exact("Content-Type"), Value::pattern("application/*").unwrap()),
                    (Value::exact("Authorization"), Value::pattern("bearer *").unwrap()),
                ],
                ..RequestPattern::default()
            },
            request: json_post(),
            expected: true,
        },
        TestData {
            pattern: RequestPattern {
                headers: vec![(Value::exact("x-api-key"), Value::Any)],
                ..RequestPattern::default()
            },
            request: json_post(),
            expected: false,
        },
        TestData {
            pattern: RequestPattern {
                content: Value::pattern(r#"*"name":"Ada"*"#).unwrap(),
                ..RequestPattern::default()
            },
            request: json_post(),
            expected: true,
        },
        TestData {
            pattern: RequestPattern {
                content: Value::exact(r#"{"NAME":"ADA"}"#),
                ..RequestPattern::default()
            },
            request: json_post(),
            expected: false,
        },
        TestData {
            pattern: RequestPattern {
                version: Value::exact(Version::HTTP_2),
                ..RequestPattern::default()
            },
            request: json_post(),
            expected: false,
        },
        TestData {
            pattern: RequestPattern {
                headers: Vec::new(),
                ..RequestPattern::default()
            },
            request: http::Request::get("https://api.example.com/").body(Bytes::new()).unwrap(),
            expected: true,
        },
        TestData {
            pattern: RequestPattern {
                content: Value::exact(""),
                ..RequestPattern::default()
            },
            request: http::Request::get("https://api.example.com/").body(Bytes::new()).unwrap(),
            expected: false,
        },
    ];

    for (idx, test_data) in tests.into_iter().enumerate() {
        println!("Running test case with index '{idx}'");

        let req = capture(test_data.request);
        assert_eq!(
            test_data.pattern.is_match(&req, &MatchOptions::default()),
            test_data.expected,
            "test case {} with pattern {}",
            idx,
            test_data.pattern
        );
    }
}

#[test]
fn empty_body_with_content_type_is_present_content() {
    let req = capture(
        http::Request::post("https://api.example.com/users")
            .header("content-type", "text/plain")
            .body(Bytes::new())
            .unwrap(),
    );

    let pattern = RequestPattern {
        content: Value::exact(""),
        ..RequestPattern::default()
    };
    assert!(pattern.is_match(&req, &MatchOptions::default()));
}

#[test]
fn body_is_decoded_with_declared_charset() {
    let req = capture(
        http::Request::post("https://api.example.com/names")
            .header("content-type", "text/plain; charset=iso-8859-1")
            .body(Bytes::from_static(&[0x4A, 0xFC, 0x72, 0x67, 0x65, 0x6E]))
            .unwrap(),
    );

    let pattern = RequestPattern {
        content: Value::exact("Jürgen"),
        ..RequestPattern::default()
    };
    assert!(pattern.is_match(&req, &MatchOptions::default()));
}

#[test]
fn per_field_result_reports_each_mismatch() {
    let req = capture(
        http::Request::get("http://api.example.com:8080/users?page=2")
            .body(Bytes::new())
            .unwrap(),
    );

    let pattern = RequestPattern {
        method: Value::exact(Method::DELETE),
        request_uri: UriPattern {
            port: Value::exact("9090"),
            query: Value::exact("page=1"),
            ..UriPattern::any()
        },
        ..RequestPattern::default()
    };

    let result = pattern.matches(&req, &MatchOptions::default());
    assert!(!result.is_match());
    assert!(!result.method);
    assert!(!result.request_uri.port);
    assert!(!result.request_uri.query);
    assert!(result.request_uri.scheme && result.request_uri.host && result.request_uri.path);
    assert!(result.version && result.headers && result.content);
    assert_eq!(result.mismatched_fields(), vec!["method", "port", "query"]);
}

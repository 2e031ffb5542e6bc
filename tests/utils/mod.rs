use bytes::Bytes;
use std::panic::{self, AssertUnwindSafe};

pub fn init_logging() {
    let _ = env_logger::try_init();
}

pub fn get(uri: &str) -> http::Request<Bytes> {
    http::Request::get(uri).body(Bytes::new()).unwrap()
}

pub fn post(uri: &str, content_type: &str, body: &str) -> http::Request<Bytes> {
    http::Request::post(uri)
        .header("content-type", content_type)
        .body(Bytes::from(body.to_string()))
        .unwrap()
}

/// Runs `f` and checks that it panics with a message containing `fragments` in order.
pub fn expect_fails_with<F: FnOnce()>(fragments: &[&str], f: F) {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(hook);

    let payload = match outcome {
        Ok(()) => panic!("expected a panic mentioning {:?}", fragments),
        Err(payload) => payload,
    };
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_default();

    let mut rest = message.as_str();
    for fragment in fragments {
        match rest.find(fragment) {
            Some(idx) => rest = &rest[idx + fragment.len()..],
            None => panic!("'{}' not found in order in panic message:\n{}", fragment, message),
        }
    }
}

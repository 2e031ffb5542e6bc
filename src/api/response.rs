use crate::common::data::{CapturedRequest, Error};
use async_trait::async_trait;
use bytes::Bytes;
use futures_timer::Delay;
use futures_util::{
    future::{select, Either},
    pin_mut,
};
use http::{header, StatusCode};
use serde::Serialize;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio_util::sync::CancellationToken;

/// Produces the response a [FakeHandler](crate::FakeHandler) returns for a captured request.
#[async_trait]
pub trait Response: Send + Sync {
    async fn respond(
        &self,
        req: &CapturedRequest,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error>;
}

#[async_trait]
impl<R: Response + ?Sized> Response for Arc<R> {
    async fn respond(
        &self,
        req: &CapturedRequest,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        (**self).respond(req, cancel).await
    }
}

#[async_trait]
impl<R: Response + ?Sized> Response for Box<R> {
    async fn respond(
        &self,
        req: &CapturedRequest,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        (**self).respond(req, cancel).await
    }
}

/// The response used when nothing else applies: `404 Not Found` with an empty body.
pub fn not_found() -> StatusCodeResponse {
    StatusCodeResponse::new(StatusCode::NOT_FOUND)
}

fn build(
    status: StatusCode,
    content_type: Option<&str>,
    body: Bytes,
) -> Result<http::Response<Bytes>, Error> {
    let mut builder = http::Response::builder().status(status);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    Ok(builder.body(body)?)
}

// ************************************************************************************************
// StatusCodeResponse
// ************************************************************************************************
#[derive(Debug, Clone)]
pub struct StatusCodeResponse {
    status: StatusCode,
}

impl StatusCodeResponse {
    pub fn new(status: StatusCode) -> Self {
        Self { status }
    }
}

#[async_trait]
impl Response for StatusCodeResponse {
    async fn respond(
        &self,
        _req: &CapturedRequest,
        _cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        build(self.status, None, Bytes::new())
    }
}

// ************************************************************************************************
// TextResponse
// ************************************************************************************************
#[derive(Debug, Clone)]
pub struct TextResponse {
    status: StatusCode,
    content_type: String,
    body: String,
}

impl TextResponse {
    pub fn new<S: Into<String>>(body: S) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: body.into(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }
}

#[async_trait]
impl Response for TextResponse {
    async fn respond(
        &self,
        _req: &CapturedRequest,
        _cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        build(
            self.status,
            Some(self.content_type.as_str()),
            Bytes::from(self.body.clone()),
        )
    }
}

// ************************************************************************************************
// JsonResponse
// ************************************************************************************************
#[derive(Debug, Clone)]
pub struct JsonResponse {
    status: StatusCode,
    body: Bytes,
}

impl JsonResponse {
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Self {
            status: StatusCode::OK,
            body: Bytes::from(serde_json::to_vec(value)?),
        })
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

#[async_trait]
impl Response for JsonResponse {
    async fn respond(
        &self,
        _req: &CapturedRequest,
        _cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        build(
            self.status,
            Some("application/json; charset=utf-8"),
            self.body.clone(),
        )
    }
}

// ************************************************************************************************
// DelayedResponse
// ************************************************************************************************
/// Waits before delegating to another response. Cancelling the request while waiting fails
/// it with [Error::Cancelled].
pub struct DelayedResponse {
    inner: Box<dyn Response>,
    delay: Duration,
}

impl DelayedResponse {
    pub fn new<R: Response + 'static>(inner: R, delay: Duration) -> Self {
        Self {
            inner: Box::new(inner),
            delay,
        }
    }
}

#[async_trait]
impl Response for DelayedResponse {
    async fn respond(
        &self,
        req: &CapturedRequest,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let delay = Delay::new(self.delay);
        let cancelled = cancel.cancelled();
        pin_mut!(delay);
        pin_mut!(cancelled);

        match select(delay, cancelled).await {
            Either::Left(_) => self.inner.respond(req, cancel).await,
            Either::Right(_) => Err(Error::Cancelled),
        }
    }
}

// ************************************************************************************************
// SequenceResponse
// ************************************************************************************************
/// Returns its responses one after the other, one per request.
pub struct SequenceResponse {
    responses: Vec<Box<dyn Response>>,
    next: AtomicUsize,
    repeat_last: bool,
}

impl SequenceResponse {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            next: AtomicUsize::new(0),
            repeat_last: false,
        }
    }

    pub fn then<R: Response + 'static>(mut self, response: R) -> Self {
        self.responses.push(Box::new(response));
        self
    }

    /// Keeps returning the last response once the sequence has been used up.
    pub fn repeat_last(mut self) -> Self {
        self.repeat_last = true;
        self
    }
}

impl Default for SequenceResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Response for SequenceResponse {
    async fn respond(
        &self,
        req: &CapturedRequest,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        let idx = self.next.fetch_add(1, Ordering::SeqCst);

        let response = match self.responses.get(idx) {
            Some(response) => response,
            None if self.repeat_last => self.responses.last().ok_or(Error::SequenceExhausted)?,
            None => return Err(Error::SequenceExhausted),
        };

        response.respond(req, cancel).await
    }
}

// ************************************************************************************************
// TimeoutResponse
// ************************************************************************************************
/// Never responds. Fails with [Error::Cancelled] when the request is cancelled, or with
/// [Error::Timeout] once the configured time has passed.
#[derive(Debug, Clone)]
pub struct TimeoutResponse {
    after: Duration,
}

impl TimeoutResponse {
    pub fn new(after: Duration) -> Self {
        Self { after }
    }
}

#[async_trait]
impl Response for TimeoutResponse {
    async fn respond(
        &self,
        _req: &CapturedRequest,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        let delay = Delay::new(self.after);
        let cancelled = cancel.cancelled();
        pin_mut!(delay);
        pin_mut!(cancelled);

        match select(delay, cancelled).await {
            Either::Left(_) => Err(Error::Timeout(self.after)),
            Either::Right(_) => Err(Error::Cancelled),
        }
    }
}

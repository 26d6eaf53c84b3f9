//! Newline-delimited JSON framing for streamed request and response bodies.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use bytes::{Bytes, BytesMut};
use catalog_interceptors::prelude::*;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::convert::Infallible;
use tokio_util::sync::DropGuard;

use super::error::ApiError;

pub const NDJSON: &str = "application/x-ndjson";

pub fn encode_line<T: Serialize>(value: &T) -> Bytes {
    let mut line = serde_json::to_vec(value).unwrap_or_else(|err| {
        serde_json::to_vec(&ApiError::new(Status::internal(err.to_string())).view())
            .unwrap_or_default()
    });
    line.push(b'\n');
    Bytes::from(line)
}

#[derive(Serialize)]
struct ErrorLine {
    error: catalog_errors::render::PublicErrorView,
}

/// Streams `messages` as NDJSON. A failing stream ends with one `{"error": ...}` line.
///
/// `guard` lives as long as the body; dropping the body cancels the call.
pub fn response<T>(
    messages: Streaming<T>,
    guard: DropGuard,
    request_id: Option<String>,
) -> Response
where
    T: Serialize + Send + 'static,
{
    let lines = messages.map(move |item| {
        let _alive = &guard;
        let line = match item {
            Ok(message) => encode_line(&message),
            Err(status) => encode_line(&ErrorLine {
                error: ApiError::tagged(request_id.clone())(status).view(),
            }),
        };
        Ok::<_, Infallible>(line)
    });
    ([(CONTENT_TYPE, NDJSON)], Body::from_stream(lines)).into_response()
}

/// Splits an incoming byte stream into lines.
#[derive(Default)]
pub struct LineSplitter {
    buf: BytesMut,
}

impl LineSplitter {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line = self.buf.split_to(pos + 1).freeze();
            lines.push(line.slice(..pos));
        }
        lines
    }

    /// The trailing line when the input did not end with a newline.
    pub fn finish(self) -> Option<Bytes> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf.freeze())
        }
    }
}

/// Forwards each NDJSON line of `body` into `sink` as one message. Blank lines are skipped.
pub async fn pump_lines<T>(body: Body, sink: StreamSink<T>)
where
    T: DeserializeOwned,
{
    let mut chunks = body.into_data_stream();
    let mut splitter = LineSplitter::default();

    while let Some(chunk) = chunks.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                sink.fail(Status::invalid_argument(format!(
                    "cannot read request stream: {err}"
                )))
                .await;
                return;
            }
        };
        for line in splitter.push(&chunk) {
            if !forward(&line, &sink).await {
                return;
            }
        }
    }
    if let Some(line) = splitter.finish() {
        forward(&line, &sink).await;
    }
}

async fn forward<T: DeserializeOwned>(line: &[u8], sink: &StreamSink<T>) -> bool {
    if line.iter().all(u8::is_ascii_whitespace) {
        return true;
    }
    match serde_json::from_slice::<T>(line) {
        Ok(message) => sink.send(message).await.is_ok(),
        Err(err) => {
            sink.clone()
                .fail(Status::invalid_argument(format!("malformed request line: {err}")))
                .await;
            false
        }
    }
}

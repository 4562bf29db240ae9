//! `text/event-stream` responses backed by an mpsc receiver.

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Bound of the channel between a use case and the response body.
pub const CHANNEL_CAPACITY: usize = 64;

/// Stream every item of `rx`, rendered by `frame`, as an SSE body.
///
/// The body ends when every sender is dropped. Dropping the body (client
/// disconnect) closes the receiver, which stops the producing use case.
pub fn event_stream<T, F>(rx: mpsc::Receiver<T>, frame: F) -> Response
where
    T: Send + 'static,
    F: Fn(T) -> String + Send + 'static,
{
    let frames = ReceiverStream::new(rx).map(move |item| Ok::<_, Infallible>(frame(item)));

    (
        [
            (CONTENT_TYPE, "text/event-stream"),
            (CACHE_CONTROL, "no-cache"),
            (CONNECTION, "keep-alive"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

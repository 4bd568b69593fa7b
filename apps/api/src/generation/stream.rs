//! Server-sent event framing for streamed generations.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tokio::sync::mpsc;

/// One frame on the wire. A stream carries any number of `Token`s and ends
/// with exactly one `Done` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Token(String),
    Done,
    Error(String),
}

impl StreamFrame {
    /// Multi-line tokens become consecutive `data:` lines, which SSE clients
    /// rejoin with `\n`.
    pub fn encode(&self) -> String {
        match self {
            StreamFrame::Token(token) => {
                let mut out = String::new();
                for line in token.split('\n') {
                    out.push_str("data: ");
                    out.push_str(line);
                    out.push('\n');
                }
                out.push('\n');
                out
            }
            StreamFrame::Done => "data: [DONE]\n\n".to_string(),
            StreamFrame::Error(message) => format!("error: {}\n\n", message.replace('\n', " ")),
        }
    }
}

/// Turns a frame channel into a `text/event-stream` response.
pub fn event_stream(rx: mpsc::Receiver<StreamFrame>) -> Response {
    let frames = futures::stream::unfold(rx, |mut rx| async move {
        let frame = rx.recv().await?;
        Some((Ok::<_, std::convert::Infallible>(Bytes::from(frame.encode())), rx))
    });

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (
                header::HeaderName::from_static("x-accel-buffering"),
                HeaderValue::from_static("no"),
            ),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_token_frame() {
        assert_eq!(StreamFrame::Token("Hello".into()).encode(), "data: Hello\n\n");
    }

    #[test]
    fn test_multiline_token_frame() {
        assert_eq!(
            StreamFrame::Token("Dear team,\n\nI".into()).encode(),
            "data: Dear team,\ndata: \ndata: I\n\n"
        );
    }

    #[test]
    fn test_terminal_frames() {
        assert_eq!(StreamFrame::Done.encode(), "data: [DONE]\n\n");
        assert_eq!(
            StreamFrame::Error("LLM down".into()).encode(),
            "error: LLM down\n\n"
        );
    }

    #[tokio::test]
    async fn test_event_stream_response() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(StreamFrame::Token("Hi ".into())).await.unwrap();
        tx.send(StreamFrame::Token("there".into())).await.unwrap();
        tx.send(StreamFrame::Done).await.unwrap();
        drop(tx);

        let response = event_stream(rx);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers()["x-accel-buffering"], "no");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "data: Hi \n\ndata: there\n\ndata: [DONE]\n\n"
        );
    }
}

// src/llm/sse.rs
//! Decoding for the upstream completion SSE stream.
//!
//! The decoder buffers raw byte chunks and yields complete `data:` frames;
//! `StreamChunk` pulls the text delta out of a chat-completions frame.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Buffered SSE decoder.
///
/// Chunks arriving off the wire can split a frame anywhere; incomplete data
/// stays buffered until the terminating newline shows up. The buffer is
/// bounded so a malformed stream cannot grow it without limit.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    const MAX_BUFFER_SIZE: usize = 1024 * 1024;

    pub fn new() -> Self {
        Self { buffer: String::new() }
    }

    /// Push a chunk of bytes and drain every complete `data:` frame.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        if self.buffer.len() > Self::MAX_BUFFER_SIZE {
            tracing::warn!(
                "SSE buffer exceeded {}KB, dropping oldest half",
                Self::MAX_BUFFER_SIZE / 1024
            );
            let keep_from = self.buffer.len() - (Self::MAX_BUFFER_SIZE / 2);
            self.buffer = self.buffer[keep_from..].to_string();
        }

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].trim().to_string();
            self.buffer.drain(..=pos);

            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            if let Some(data) = line.strip_prefix("data:") {
                frames.push(SseFrame { data: data.trim().to_string() });
            }
            // event:/id:/retry: lines carry nothing we use
        }
        frames
    }

    /// Whether a partial frame is still buffered.
    pub fn has_remaining(&self) -> bool {
        !self.buffer.is_empty()
    }
}

/// One complete SSE data frame, without the `data:` prefix.
#[derive(Debug, Clone)]
pub struct SseFrame {
    pub data: String,
}

impl SseFrame {
    /// The upstream terminator frame.
    pub fn is_done(&self) -> bool {
        self.data == "[DONE]"
    }

    /// Parse the frame payload, `None` when it is not valid JSON of `T`.
    pub fn try_parse<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_str(&self.data).ok()
    }
}

/// Incremental frame of a streamed chat completion.
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamDelta {
    pub content: Option<String>,
}

impl StreamChunk {
    /// The text delta carried by this frame, if any. Frames without a
    /// content delta (role announcements, finish markers) yield `None`.
    pub fn delta_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.delta.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_complete_frames() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push_str("data: {\"a\":1}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"a\":1}");
    }

    #[test]
    fn buffers_partial_frames_across_pushes() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push_str("data: {\"part\":").is_empty());
        assert!(decoder.has_remaining());

        let frames = decoder.push_str(" 1}\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"part\": 1}");
    }

    #[test]
    fn multiple_frames_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push_str("data: one\ndata: two\n\ndata: [DONE]\n\n");
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].data, "one");
        assert_eq!(frames[1].data, "two");
        assert!(frames[2].is_done());
    }

    #[test]
    fn ignores_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push_str(": keepalive\nevent: message\ndata: x\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "x");
    }

    #[test]
    fn malformed_json_parses_to_none() {
        let frame = SseFrame { data: "{not json".into() };
        assert!(frame.try_parse::<StreamChunk>().is_none());
    }

    #[test]
    fn extracts_content_delta() {
        let frame = SseFrame {
            data: r#"{"choices":[{"delta":{"content":"你好"}}]}"#.into(),
        };
        let chunk: StreamChunk = frame.try_parse().unwrap();
        assert_eq!(chunk.delta_text().as_deref(), Some("你好"));

        let frame = SseFrame {
            data: r#"{"choices":[{"delta":{"role":"assistant"}}]}"#.into(),
        };
        let chunk: StreamChunk = frame.try_parse().unwrap();
        assert!(chunk.delta_text().is_none());
    }

    impl SseDecoder {
        fn push_str(&mut self, s: &str) -> Vec<SseFrame> {
            self.push(s.as_bytes())
        }
    }
}

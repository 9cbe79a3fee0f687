//! Response body types
//!
//! Every handler answers with the same boxed body so that buffered and
//! streamed responses can flow through one pipeline.

use futures_util::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Default read size for streamed files
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

pub type Body = UnsyncBoxBody<Bytes, io::Error>;

/// Buffered body
pub fn full(data: impl Into<Bytes>) -> Body {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Empty body (304, HEAD, 101)
pub fn empty() -> Body {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Lazily streamed file body
///
/// One read of at most `chunk_size` bytes per polled frame; the stream ends on
/// the first zero-length read. The file handle lives inside the stream and is
/// closed when the body is exhausted or dropped.
pub fn file_stream(file: File, chunk_size: usize) -> Body {
    let chunk_size = chunk_size.max(1);
    let chunks = stream::try_unfold(file, move |mut file| async move {
        let mut buf = vec![0u8; chunk_size];
        match file.read(&mut buf).await {
            Ok(0) => Ok(None),
            Ok(read) => {
                buf.truncate(read);
                Ok(Some((Frame::data(Bytes::from(buf)), file)))
            }
            Err(e) => Err(e),
        }
    });
    StreamBody::new(chunks).boxed_unsync()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_stream_chunks() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[7u8; 10]).unwrap();

        let file = File::open(tmp.path()).await.unwrap();
        let mut body = file_stream(file, 4);

        let mut total = 0;
        let mut frames = 0;
        while let Some(frame) = body.frame().await {
            let data = frame.unwrap().into_data().unwrap();
            assert!(!data.is_empty() && data.len() <= 4);
            total += data.len();
            frames += 1;
        }
        assert_eq!(total, 10);
        assert!(frames >= 3);
    }

    #[tokio::test]
    async fn test_full_and_empty() {
        let collected = full("hello").collect().await.unwrap().to_bytes();
        assert_eq!(&collected[..], b"hello");

        let collected = empty().collect().await.unwrap().to_bytes();
        assert!(collected.is_empty());
    }
}

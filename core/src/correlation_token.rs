// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bytes::{Buf, BufMut, BytesMut};
use std::fmt;
use std::io;
use tokio_util::codec::{Decoder, Encoder};

/// Width of one token on the wire
pub const TOKEN_LEN: usize = 8;

/// Value written on a task channel and echoed back on the result channel.
///
/// It is the remaining-task count at dispatch time, so it only correlates a
/// result with the assignment that produced it. Two tokens are never live with
/// the same value because the counter strictly decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationToken(u64);

impl CorrelationToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-width big-endian framing for correlation tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationTokenCodec;

impl Decoder for CorrelationTokenCodec {
    type Item = CorrelationToken;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < TOKEN_LEN {
            src.reserve(TOKEN_LEN - src.len());
            return Ok(None);
        }
        Ok(Some(CorrelationToken(src.get_u64())))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(token) => Ok(Some(token)),
            None if src.is_empty() => Ok(None),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "channel closed inside a token frame ({} of {} bytes)",
                    src.len(),
                    TOKEN_LEN
                ),
            )),
        }
    }
}

impl Encoder<CorrelationToken> for CorrelationTokenCodec {
    type Error = io::Error;

    fn encode(&mut self, item: CorrelationToken, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(TOKEN_LEN);
        dst.put_u64(item.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    #[test]
    fn test_encode_writes_big_endian_fixed_width() {
        let mut buf = BytesMut::new();
        CorrelationTokenCodec
            .encode(CorrelationToken::new(0x0102), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], &[0, 0, 0, 0, 0, 0, 0x01, 0x02]);
    }

    #[test]
    fn test_decode_waits_for_full_frame() {
        let mut buf = BytesMut::from(&[0u8, 0, 0, 7][..]);
        assert_eq!(CorrelationTokenCodec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(&[0, 0, 0, 9]);
        let token = CorrelationTokenCodec.decode(&mut buf).unwrap();
        assert_eq!(token, Some(CorrelationToken::new((7 << 32) | 9)));
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_clean_eof_ends_stream() {
        let mut wire = Vec::new();
        {
            let mut sink = FramedWrite::new(&mut wire, CorrelationTokenCodec);
            sink.send(CorrelationToken::new(3)).await.unwrap();
            sink.send(CorrelationToken::new(2)).await.unwrap();
        }

        let mut stream = FramedRead::new(&wire[..], CorrelationTokenCodec);
        assert_eq!(stream.next().await.unwrap().unwrap().value(), 3);
        assert_eq!(stream.next().await.unwrap().unwrap().value(), 2);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_eof_inside_frame_is_an_error() {
        let wire = [0u8, 0, 0, 0, 0];
        let mut stream = FramedRead::new(&wire[..], CorrelationTokenCodec);
        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}

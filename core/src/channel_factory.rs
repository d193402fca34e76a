// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::io;
use tokio::io::{AsyncRead, AsyncWrite};

/// Trait for creating unidirectional byte-stream channels
/// Different implementations for OS pipes, in-memory streams, etc.
///
/// Dropping the writer must make the reader observe end-of-stream once the
/// buffered bytes are consumed. Dropping the reader must make further writes fail.
pub trait ChannelFactory: Send + Sync + 'static {
    type Reader: AsyncRead + Unpin + Send + 'static;
    type Writer: AsyncWrite + Unpin + Send + 'static;

    /// Create one channel and return its (read end, write end)
    fn create_channel(&self) -> io::Result<(Self::Reader, Self::Writer)>;
}

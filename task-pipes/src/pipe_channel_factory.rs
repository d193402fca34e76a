// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::io;
use tokio::net::unix::pipe;
use worker_pool_core::ChannelFactory;

/// Anonymous OS pipes registered with the tokio reactor
///
/// Dropping the sender closes the write descriptor, so the receiver reads
/// end-of-stream; writing after the receiver is gone fails with `BrokenPipe`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipeChannelFactory;

impl ChannelFactory for PipeChannelFactory {
    type Reader = pipe::Receiver;
    type Writer = pipe::Sender;

    fn create_channel(&self) -> io::Result<(Self::Reader, Self::Writer)> {
        let (tx, rx) = pipe::pipe()?;
        Ok((rx, tx))
    }
}

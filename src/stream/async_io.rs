//! `futures-io` implementations for [`BufferStream`].
//!
//! The buffer lives in memory, so every poll completes immediately. These
//! impls only exist to let a buffer stand in for an async reader or writer,
//! for any runtime built on `futures-io`.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::{AsyncRead, AsyncSeek, AsyncWrite};

use super::BufferStream;
use crate::buffer::Buffer;

impl<B: Buffer<u8> + Unpin> AsyncRead for BufferStream<B> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Read::read(&mut *self, buf))
    }
}

impl<B: Buffer<u8> + Unpin> AsyncWrite for BufferStream<B> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Write::write(&mut *self, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl<B: Buffer<u8> + Unpin> AsyncSeek for BufferStream<B> {
    fn poll_seek(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        pos: SeekFrom,
    ) -> Poll<io::Result<u64>> {
        Poll::Ready(Seek::seek(&mut *self, pos))
    }
}

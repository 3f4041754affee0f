//! Frame-boundary reader over a blocking byte source.
//!
//! The device stream carries back-to-back 16-byte frames with no length
//! prefix, so framing is purely positional.  `FrameReader` keeps reading
//! until a full frame is assembled, which means a transient short read on a
//! socket (fewer than 16 bytes available *right now*) is never confused with
//! the peer closing the stream.
//!
//! End of stream:
//! - EOF on a frame boundary ends the stream cleanly.
//! - EOF after 1–15 bytes of a frame also ends the stream; the incomplete
//!   frame is discarded and counted in [`FrameReader::truncated_bytes`].
//!
//! Any other I/O error is returned unchanged; the reader never retries except
//! on [`std::io::ErrorKind::Interrupted`].

use std::io::{self, Read};

use tracing::warn;

use crate::protocol::frame::{RawFrame, FRAME_SIZE};

/// Pulls whole [`RawFrame`]s out of a byte source.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
    frames_read: u64,
    truncated_bytes: usize,
    finished: bool,
}

impl<R: Read> FrameReader<R> {
    /// Wraps a blocking byte source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            frames_read: 0,
            truncated_bytes: 0,
            finished: false,
        }
    }

    /// Reads the next full frame.
    ///
    /// Returns `Ok(None)` once the source is exhausted; every later call also
    /// returns `Ok(None)` without touching the source again.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the source fails (connection reset,
    /// broken pipe, etc.).
    pub fn next_frame(&mut self) -> io::Result<Option<RawFrame>> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = [0u8; FRAME_SIZE];
        let mut filled = 0usize;

        while filled < FRAME_SIZE {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.finished = true;
                    if filled > 0 {
                        warn!(
                            "stream ended mid-frame; discarding {filled} of {FRAME_SIZE} bytes"
                        );
                        self.truncated_bytes = filled;
                    }
                    return Ok(None);
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        self.frames_read += 1;
        Ok(Some(RawFrame::new(buf)))
    }

    /// Number of complete frames returned so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Bytes of an incomplete trailing frame discarded at end of stream.
    pub fn truncated_bytes(&self) -> usize {
        self.truncated_bytes
    }

    /// Returns `true` once end of stream has been observed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = io::Result<RawFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Buffered streaming of source files into the archive writer.
//!
//! A single [`CopyBuffer`] is reused for every file of a run so memory stays
//! bounded by one buffer regardless of file count or size.

use std::io;
use std::io::Read;
use std::io::Write;

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable copy buffer.
#[derive(Debug)]
pub struct CopyBuffer {
    #[allow(clippy::large_stack_arrays)]
    buf: [u8; COPY_BUFFER_SIZE],
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[inline]
    #[must_use]
    #[allow(clippy::large_stack_arrays)]
    pub fn new() -> Self {
        Self {
            buf: [0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        COPY_BUFFER_SIZE
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side of a copy failed.
///
/// The builder treats a read failure as a problem with one source file and a
/// write failure as a problem with the archive itself, so the two must stay
/// distinguishable.
#[derive(Debug)]
pub enum CopyFailure {
    /// Reading the source failed.
    Read(io::Error),
    /// Writing to the destination failed.
    Write(io::Error),
}

/// Copies data from reader to writer using the provided reusable buffer.
///
/// Interrupted reads are retried. Returns the total number of bytes copied.
///
/// # Errors
///
/// Returns [`CopyFailure::Read`] if reading fails and [`CopyFailure::Write`]
/// if writing fails.
///
/// # Examples
///
/// ```
/// use packlet_core::copy::CopyBuffer;
/// use packlet_core::copy::copy_with_buffer;
///
/// let mut buffer = CopyBuffer::new();
/// let mut input: &[u8] = b"exports.handler = async () => {};";
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
/// assert_eq!(copied, output.len() as u64);
/// ```
#[inline]
pub fn copy_with_buffer<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, CopyFailure> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyFailure::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyFailure::Write)?;

        total += bytes_read as u64;
    }

    Ok(total)
}

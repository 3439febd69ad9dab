//! Default byte-stream content equality.

use std::io::{self, BufRead, BufReader, Read};

use tracing::debug;

use crate::traits::{ContentEquality, ContentSource};

/// Default buffer size used when streaming content for comparison.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Compares two inputs by streaming their byte content.
///
/// - The same reference on both sides is equal without opening anything.
/// - An input whose stream cannot be opened is treated as having no byte
///   content. A single unreadable leaf therefore degrades to an equality
///   judgment instead of aborting the comparison.
/// - Two inputs without byte content are equal; exactly one without
///   content is unequal.
/// - Otherwise bytes are compared in buffered chunks and the comparison
///   stops at the first mismatch. A read error part-way through counts
///   as a mismatch.
#[derive(Clone, Copy, Debug)]
pub struct StreamEquality {
    buffer_size: usize,
}

impl StreamEquality {
    /// Create a comparator with [`DEFAULT_BUFFER_SIZE`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comparator reading `buffer_size` bytes at a time (minimum 1).
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Compare two already-opened streams using the rules above.
    pub fn streams_equal(&self, left: Option<Box<dyn Read + '_>>, right: Option<Box<dyn Read + '_>>) -> bool {
        match (left, right) {
            (None, None) => true,
            (Some(_), None) | (None, Some(_)) => false,
            (Some(left), Some(right)) => match self.compare_readers(left, right) {
                Ok(equal) => equal,
                Err(e) => {
                    debug!(error = %e, "read failed during content comparison");
                    false
                }
            },
        }
    }

    fn compare_readers(&self, left: Box<dyn Read + '_>, right: Box<dyn Read + '_>) -> io::Result<bool> {
        let mut left = BufReader::with_capacity(self.buffer_size, left);
        let mut right = BufReader::with_capacity(self.buffer_size, right);

        loop {
            let l = left.fill_buf()?;
            let r = right.fill_buf()?;
            if l.is_empty() || r.is_empty() {
                return Ok(l.is_empty() && r.is_empty());
            }
            let n = l.len().min(r.len());
            if l[..n] != r[..n] {
                return Ok(false);
            }
            left.consume(n);
            right.consume(n);
        }
    }
}

impl Default for StreamEquality {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl<T: ContentSource> ContentEquality<T> for StreamEquality {
    fn contents_equal(&self, a: &T, b: &T) -> bool {
        if std::ptr::eq(a, b) {
            return true;
        }
        self.streams_equal(open_or_none(a), open_or_none(b))
    }
}

fn open_or_none<T: ContentSource>(input: &T) -> Option<Box<dyn Read + '_>> {
    match input.open() {
        Ok(stream) => stream,
        Err(e) => {
            debug!(error = %e, "content unavailable; treating as empty");
            None
        }
    }
}

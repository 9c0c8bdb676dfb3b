//! Text/binary container detection.
//!
//! AFE files come either as plain XML or as a binary container:
//!
//! ```text
//! [0, 16)        opaque header
//! [16, 18)       markup length L, little-endian u16
//! [18, 20)       reserved
//! [20, 20 + L)   XML markup
//! ...            trailing binary data (ignored)
//! ```
//!
//! The two are told apart by looking at the first 16 bytes: if they are
//! all printable ASCII the file is treated as text. This is a heuristic,
//! not a format check.

use std::ops::Range;

use crate::config::{BINARY_HEADER_LEN, MARKUP_LEN_OFFSET, MIN_FILE_LEN, SNIFF_LEN};
use crate::error::{ImportError, Result};

/// How the markup is stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// The whole file is markup.
    Text,
    /// Markup wrapped in the binary header.
    Binary,
}

/// Result of classifying a file buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub kind: ContainerKind,
    /// Byte range of the markup within the buffer.
    pub markup: Range<usize>,
}

impl Container {
    pub fn is_binary(&self) -> bool {
        self.kind == ContainerKind::Binary
    }

    /// Slice the markup out of the buffer this container was classified from.
    pub fn markup_bytes<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[self.markup.clone()]
    }
}

/// Classify a raw file buffer and locate its markup.
pub fn classify(bytes: &[u8]) -> Result<Container> {
    if bytes.len() < MIN_FILE_LEN {
        return Err(ImportError::invalid_format(format!(
            "not enough data ({} bytes, need at least {})",
            bytes.len(),
            MIN_FILE_LEN
        )));
    }

    if bytes[..SNIFF_LEN].iter().copied().all(is_text_byte) {
        return Ok(Container {
            kind: ContainerKind::Text,
            markup: 0..bytes.len(),
        });
    }

    let len_field = [bytes[MARKUP_LEN_OFFSET], bytes[MARKUP_LEN_OFFSET + 1]];
    let markup_len = u16::from_le_bytes(len_field) as usize;

    // A length running past the buffer is cut short rather than rejected.
    let end = (BINARY_HEADER_LEN + markup_len).min(bytes.len());

    Ok(Container {
        kind: ContainerKind::Binary,
        markup: BINARY_HEADER_LEN..end,
    })
}

/// Printable ASCII plus tab, CR and LF.
fn is_text_byte(b: u8) -> bool {
    matches!(b, b' '..=b'~' | b'\t' | b'\n' | b'\r')
}

//! The fixed-format `[HIPIFY] warning: ...` diagnostic stream.
//!
//! This is deliberately not routed through `tracing`: its wire format is a
//! consumer-visible contract (tools grep this output), while `tracing` is
//! for this binary's own internal narration.

use std::fmt;
use std::path::Path;

use hipify_core::text;

/// One warning-level diagnostic: an unsupported reference, an unrecognized
/// reference, or an unsupported header.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, line: u32, column: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Build a diagnostic from a byte offset into `content`, resolving the
    /// line/column the way the rest of this crate resolves positions.
    pub fn at_offset(
        file: &Path,
        content: &[u8],
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        let (line, column) = text::byte_offset_to_position(content, offset);
        Diagnostic::new(file.display().to_string(), line, column, message)
    }

    pub fn unsupported_reference(
        file: &Path,
        content: &[u8],
        offset: usize,
        name: &str,
    ) -> Self {
        Diagnostic::at_offset(
            file,
            content,
            offset,
            format!("{name} is not supported", name = name),
        )
    }

    pub fn unrecognized_reference(
        file: &Path,
        content: &[u8],
        offset: usize,
        name: &str,
        site_kind: &str,
    ) -> Self {
        Diagnostic::at_offset(
            file,
            content,
            offset,
            format!("not handled: '{name}' [{site_kind}]"),
        )
    }

    pub fn unsupported_header(file: &Path, content: &[u8], offset: usize, header: &str) -> Self {
        Diagnostic::at_offset(
            file,
            content,
            offset,
            format!("unsupported header: {header}"),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[HIPIFY] warning: {}:{}:{}: {}",
            self.file, self.line, self.column, self.message
        )
    }
}

/// Write `diagnostic` to stderr in the fixed wire format.
pub fn emit(diagnostic: &Diagnostic) {
    eprintln!("{}", diagnostic);
}

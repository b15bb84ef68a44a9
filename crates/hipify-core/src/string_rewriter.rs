//! The String Literal Rewriter.
//!
//! Scans an already-unquoted string-literal body for occurrences of the
//! rename table's identifier prefix, looks each whitespace-delimited
//! candidate up in the `IDENT` table, and emits one edit per recognized,
//! supported hit.
//!
//! Multi-byte-width literals (`L"..."`, `u"..."`, `U"..."`, `u8"..."`) are
//! the caller's concern: this module only ever sees the unquoted body of a
//! literal the caller has already determined to be 1-byte-wide.
//! `is_narrow_literal` is provided so both the preprocessor's token rewrite
//! and the AST dispatcher's string-literal handler can make that call the
//! same way.

use crate::edit::Edit;
use crate::rename_table::RenameTables;
use crate::stats::StatsCounters;

/// True if a raw literal spelling (including its prefix and quotes, e.g.
/// `"cudaMalloc"` or `L"wide"`) denotes a 1-byte-wide string literal.
pub fn is_narrow_literal(spelling: &str) -> bool {
    spelling.starts_with('"')
}

/// Find the next whitespace-delimited candidate starting at or after
/// `from`, anchored on `prefix`. Returns `(b, e)` byte offsets into `body`
/// such that `body[b..e]` is the candidate identifier.
fn next_candidate(body: &str, from: usize, prefix: &str) -> Option<(usize, usize)> {
    let search_region = body.get(from..)?;
    let rel = search_region.find(prefix)?;
    let b = from + rel;
    let e = body[b..]
        .find(char::is_whitespace)
        .map(|p| b + p)
        .unwrap_or(body.len());
    Some((b, e))
}

/// Rewrite a narrow string-literal body.
///
/// `body_start_offset` is the absolute source offset of the first byte of
/// `body` (i.e. one past the opening quote of the literal, since the
/// edit offset is `start + b + 1` where `start` is the literal's own start
/// location).
pub fn rewrite_string_literal(
    body: &str,
    body_start_offset: u32,
    tables: &RenameTables,
    stats: &mut StatsCounters,
) -> Vec<Edit> {
    let prefix = tables.identifier_prefix();
    let mut edits = Vec::new();
    let mut pos = 0usize;

    while let Some((b, e)) = next_candidate(body, pos, prefix) {
        let candidate = &body[b..e];
        if let Some(entry) = tables.lookup_ident(candidate) {
            if !entry.unsupported {
                edits.push(Edit::new(
                    body_start_offset + b as u32,
                    candidate.len() as u32,
                    entry.dst_name.clone(),
                ));
            }
            stats.record(candidate, entry.conv_type, entry.api_family, entry.unsupported);
        }
        // Resume past `e`: overlapping matches are impossible by
        // construction since we never re-scan bytes we've already
        // consumed as part of a candidate.
        pos = e;
        if pos >= body.len() {
            break;
        }
    }

    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename_table::{ApiFamily, ConvType, RenameEntry};

    fn tables_with_cuda_malloc() -> RenameTables {
        let mut tables = RenameTables::empty();
        tables.insert_ident(
            "cudaMalloc",
            RenameEntry::new("hipMalloc", ConvType::Memory, ApiFamily::Runtime),
        );
        tables
    }

    #[test]
    fn rewrites_whitespace_delimited_occurrence() {
        let tables = tables_with_cuda_malloc();
        let mut stats = StatsCounters::new();
        // `printf("error in cudaMalloc\n");`
        //          ^ body starts here, offset 8 in source (after the quote)
        let body = "error in cudaMalloc\\n";
        let edits = rewrite_string_literal(body, 8, &tables, &mut stats);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].new_text, "hipMalloc");
        assert_eq!(edits[0].old_length, "cudaMalloc".len() as u32);
        assert_eq!(edits[0].source_offset, 8 + body.find("cudaMalloc").unwrap() as u32);
    }

    #[test]
    fn punctuation_adjacent_reference_is_not_rewritten() {
        // Whitespace-only delimiting means
        // "cudaMalloc," is not recognized as the candidate "cudaMalloc".
        // This is a deliberately preserved limitation, not a bug to fix.
        let tables = tables_with_cuda_malloc();
        let mut stats = StatsCounters::new();
        let body = "cudaMalloc, then free";
        let edits = rewrite_string_literal(body, 0, &tables, &mut stats);
        assert!(edits.is_empty());
    }

    #[test]
    fn unsupported_entry_counts_but_emits_no_edit() {
        let mut tables = RenameTables::empty();
        tables.insert_ident(
            "cudaProfilerStart",
            RenameEntry::unsupported(ConvType::Other, ApiFamily::Runtime),
        );
        let mut stats = StatsCounters::new();
        let body = "call cudaProfilerStart now";
        let edits = rewrite_string_literal(body, 0, &tables, &mut stats);
        assert!(edits.is_empty());
        assert_eq!(stats.hit_count(ConvType::Other, ApiFamily::Runtime), 1);
    }

    #[test]
    fn unrecognized_candidate_is_ignored() {
        let tables = tables_with_cuda_malloc();
        let mut stats = StatsCounters::new();
        let body = "cudaSomethingElse is unrelated";
        let edits = rewrite_string_literal(body, 0, &tables, &mut stats);
        assert!(edits.is_empty());
        assert_eq!(stats.total_hits(), 0);
    }

    #[test]
    fn multiple_occurrences_each_get_an_edit() {
        let tables = tables_with_cuda_malloc();
        let mut stats = StatsCounters::new();
        let body = "cudaMalloc and again cudaMalloc";
        let edits = rewrite_string_literal(body, 0, &tables, &mut stats);
        assert_eq!(edits.len(), 2);
    }

    #[test]
    fn end_of_string_terminates_candidate() {
        let tables = tables_with_cuda_malloc();
        let mut stats = StatsCounters::new();
        let body = "cudaMalloc";
        let edits = rewrite_string_literal(body, 0, &tables, &mut stats);
        assert_eq!(edits.len(), 1);
    }

    #[test]
    fn is_narrow_literal_detects_prefix() {
        assert!(is_narrow_literal("\"cudaMalloc\""));
        assert!(!is_narrow_literal("L\"cudaMalloc\""));
        assert!(!is_narrow_literal("u8\"cudaMalloc\""));
        assert!(!is_narrow_literal("U\"cudaMalloc\""));
    }
}

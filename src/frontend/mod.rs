//! The embedded C++ front end: preprocessor observer, AST match dispatcher,
//! and the plumbing that walks one `clang::Entity` tree and feeds both.
//!
//! `clang::Index::parser(..).detailed_preprocessing_record(true)` surfaces
//! `InclusionDirective` / `MacroDefinition` / `MacroExpansion` entities
//! interleaved with ordinary AST entities in a single tree, so a single
//! recursive walk dispatches to whichever of [`preprocessor`] or [`ast`]
//! owns a given entity's kind.

pub mod ast;
pub mod preprocessor;
pub mod token_rewrite;

use std::path::Path;

use clang::{Clang, Entity, Index, Location, SourceRange, TranslationUnit};

use hipify_core::edit::{Edit, ReplacementSet};
use hipify_core::error::HipifyError;
use hipify_core::rename_table::{ApiFamily, ConvType, RenameTables};
use hipify_core::stats::StatsCounters;
use hipify_core::text;

use crate::diagnostics::Diagnostic;

/// Shared state every handler in this module reads from or writes to.
pub struct FrontendContext<'a> {
    pub file: &'a Path,
    pub content: &'a [u8],
    pub tables: &'a RenameTables,
    pub stats: &'a mut StatsCounters,
    pub edits: &'a mut ReplacementSet,
    pub diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> FrontendContext<'a> {
    /// Insert `edit` and, if it was accepted (not a duplicate-of-itself or a
    /// rejected overlap), record its line and byte-touched total so
    /// `-print-stats`/`-examine` report real numbers.
    pub fn insert_edit(&mut self, edit: Edit) {
        let (line, _) = text::byte_offset_to_position(self.content, edit.source_offset as usize);
        let bytes_touched = edit.new_text.len() as u64 + edit.old_length as u64;
        if self.edits.insert(edit).is_ok() {
            self.stats.record_edit_site(line, bytes_touched);
        }
    }
}

/// The result of parsing and rewriting one translation unit.
pub struct ParseOutcome {
    pub edits: ReplacementSet,
    pub diagnostics: Vec<Diagnostic>,
    pub had_parse_errors: bool,
}

/// Parse `file` and run the preprocessor observer + AST match dispatcher
/// over it, producing the accumulated edits and diagnostics.
pub fn parse_and_rewrite(
    file: &Path,
    content: &[u8],
    tables: &RenameTables,
    stats: &mut StatsCounters,
    resource_dir: Option<&Path>,
) -> Result<ParseOutcome, HipifyError> {
    let clang = Clang::new().map_err(HipifyError::front_end_unavailable)?;
    let index = Index::new(&clang, false, true);

    let mut args = vec!["--cuda-host-only".to_string(), "-std=c++11".to_string()];
    if let Some(dir) = resource_dir {
        args.push(format!("-resource-dir={}", dir.display()));
    }

    let tu = index
        .parser(file)
        .arguments(&args)
        .detailed_preprocessing_record(true)
        .parse()
        .map_err(|e| HipifyError::parse_failed(file, e.to_string()))?;

    let had_parse_errors = tu
        .get_diagnostics()
        .iter()
        .any(|d| matches!(d.get_severity(), clang::diagnostic::Severity::Error | clang::diagnostic::Severity::Fatal));

    let mut edits = ReplacementSet::new();
    let mut diagnostics = Vec::new();

    {
        let mut ctx = FrontendContext {
            file,
            content,
            tables,
            stats,
            edits: &mut edits,
            diagnostics: &mut diagnostics,
        };
        walk(&tu.get_entity(), &tu, &mut ctx);
    }

    if !edits.is_empty() {
        let header = ctx_runtime_header(tables);
        if !has_runtime_header(content, &edits, header) {
            let prepend = format!("#include <{}>\n", header);
            let _ = edits.insert(Edit::new(0, 0, prepend));
            stats.record(header, ConvType::Include, ApiFamily::Runtime, false);
        }
    }

    Ok(ParseOutcome {
        edits,
        diagnostics,
        had_parse_errors,
    })
}

fn ctx_runtime_header(tables: &RenameTables) -> &'static str {
    tables.runtime_header_include()
}

/// True if the output is already going to carry `#include <header>`: either
/// the source already has it verbatim, or one of the collected edits
/// rewrites an include directly to that header name (the include rewrite's
/// own replacement text, not the `#include <...>` brackets around it, which
/// are never touched by an include rewrite).
fn has_runtime_header(content: &[u8], edits: &ReplacementSet, header: &str) -> bool {
    let needle = format!("#include <{header}>");
    if let Ok(text) = std::str::from_utf8(content) {
        if text.contains(&needle) {
            return true;
        }
    }
    edits.iter().any(|edit| edit.new_text == header)
}

fn walk(entity: &Entity, tu: &TranslationUnit, ctx: &mut FrontendContext) {
    let handled = preprocessor::try_handle(entity, tu, ctx) || ast::try_handle(entity, tu, ctx);
    let _ = handled;
    for child in entity.get_children() {
        walk(&child, tu, ctx);
    }
}

/// Byte offset of `location` within `main_file`, preferring the file
/// location and returning `None` if the location belongs to a different
/// file entirely (e.g. a header).
pub(crate) fn file_offset(location: Location, main_file: &Path) -> Option<usize> {
    let file = location.file.as_ref()?;
    if file.get_path() != main_file {
        return None;
    }
    Some(location.offset as usize)
}

/// The **read range** rule: prefer file locations; fall back to spelling
/// locations when an endpoint sits inside a macro expansion.
pub(crate) fn read_range(range: &SourceRange, main_file: &Path) -> Option<(usize, usize)> {
    let start = range.get_start();
    let end = range.get_end();

    if let (Some(s), Some(e)) = (
        file_offset(start.get_file_location(), main_file),
        file_offset(end.get_file_location(), main_file),
    ) {
        return Some((s, e));
    }

    let s = file_offset(start.get_spelling_location(), main_file)?;
    let e = file_offset(end.get_spelling_location(), main_file)?;
    Some((s, e))
}

/// The **write range** rule: if either endpoint is inside a macro body
/// expansion, rewrite using spelling locations; otherwise use file
/// locations.
pub(crate) fn write_range(range: &SourceRange, main_file: &Path) -> Option<(usize, usize)> {
    let start = range.get_start();
    let end = range.get_end();

    if start.is_in_macro_expansion() || end.is_in_macro_expansion() {
        let s = file_offset(start.get_spelling_location(), main_file)?;
        let e = file_offset(end.get_spelling_location(), main_file)?;
        return Some((s, e));
    }

    let s = file_offset(start.get_file_location(), main_file)?;
    let e = file_offset(end.get_file_location(), main_file)?;
    Some((s, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hipify_core::rename_table::RenameTables;

    #[test]
    fn insert_edit_records_line_and_bytes_touched() {
        let file = Path::new("a.cu");
        let content = b"cudaError_t e = cudaMalloc(&p, 16);\n";
        let tables = RenameTables::empty();
        let mut stats = StatsCounters::new();
        let mut edits = ReplacementSet::new();
        let mut diagnostics = Vec::new();
        let mut ctx = FrontendContext {
            file,
            content,
            tables: &tables,
            stats: &mut stats,
            edits: &mut edits,
            diagnostics: &mut diagnostics,
        };
        ctx.insert_edit(Edit::new(0, 10, "hipError_t"));
        assert_eq!(stats.touched_line_count(), 1);
        assert_eq!(stats.bytes_changed(), 10 + "hipError_t".len() as u64);
    }

    #[test]
    fn insert_edit_skips_stats_on_rejected_overlap() {
        let file = Path::new("a.cu");
        let content = b"cudaMalloc(&p, 16);\n";
        let tables = RenameTables::empty();
        let mut stats = StatsCounters::new();
        let mut edits = ReplacementSet::new();
        let mut diagnostics = Vec::new();
        let mut ctx = FrontendContext {
            file,
            content,
            tables: &tables,
            stats: &mut stats,
            edits: &mut edits,
            diagnostics: &mut diagnostics,
        };
        ctx.insert_edit(Edit::new(0, 10, "hipMalloc"));
        ctx.insert_edit(Edit::new(5, 10, "somethingElse"));
        assert_eq!(stats.touched_line_count(), 1);
    }

    #[test]
    fn has_runtime_header_detects_existing_include() {
        let content = b"#include <hip/hip_runtime.h>\n";
        let edits = ReplacementSet::new();
        assert!(has_runtime_header(content, &edits, "hip/hip_runtime.h"));
    }

    #[test]
    fn has_runtime_header_detects_pending_include_rewrite() {
        let content = b"#include <cuda_runtime.h>\n";
        let mut edits = ReplacementSet::new();
        edits
            .insert(Edit::new(10, 14, "hip/hip_runtime.h"))
            .unwrap();
        assert!(has_runtime_header(content, &edits, "hip/hip_runtime.h"));
    }

    #[test]
    fn has_runtime_header_absent_when_neither() {
        let content = b"int main() {}\n";
        let edits = ReplacementSet::new();
        assert!(!has_runtime_header(content, &edits, "hip/hip_runtime.h"));
    }
}

//! The Token Rewrite procedure shared by the preprocessor's include, macro
//! definition, and macro expansion callbacks.

use hipify_core::edit::Edit;
use hipify_core::string_rewriter;

use crate::diagnostics::Diagnostic;

use super::FrontendContext;

/// What kind of token is being offered to the rewrite procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    Identifier,
    StringLiteral,
    Other,
}

/// One raw token, already resolved to a byte offset in the main file.
pub struct TokenSite<'a> {
    pub spelling: &'a str,
    pub offset: u32,
    pub shape: TokenShape,
}

/// Apply the Token Rewrite procedure to one token.
///
/// String literals delegate to the string-literal rewriter; identifiers are
/// looked up in IDENT and either rewritten, flagged unsupported, or left
/// alone; every other token kind is ignored.
pub fn rewrite_token(site: &TokenSite<'_>, ctx: &mut FrontendContext) {
    match site.shape {
        TokenShape::StringLiteral => rewrite_string_token(site, ctx),
        TokenShape::Identifier => rewrite_identifier_token(site, ctx),
        TokenShape::Other => {}
    }
}

fn rewrite_string_token(site: &TokenSite<'_>, ctx: &mut FrontendContext) {
    if !string_rewriter::is_narrow_literal(site.spelling) {
        return;
    }
    let body = site
        .spelling
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(site.spelling);
    let body_start = site.offset + 1;
    let edits = string_rewriter::rewrite_string_literal(body, body_start, ctx.tables, ctx.stats);
    for edit in edits {
        ctx.insert_edit(edit);
    }
}

fn rewrite_identifier_token(site: &TokenSite<'_>, ctx: &mut FrontendContext) {
    let Some(entry) = ctx.tables.lookup_ident(site.spelling) else {
        return;
    };
    if entry.unsupported {
        ctx.diagnostics.push(Diagnostic::unsupported_reference(
            ctx.file,
            ctx.content,
            site.offset as usize,
            site.spelling,
        ));
    } else {
        ctx.insert_edit(Edit::new(
            site.offset,
            site.spelling.len() as u32,
            entry.dst_name.clone(),
        ));
    }
    ctx.stats.record(site.spelling, entry.conv_type, entry.api_family, entry.unsupported);
}

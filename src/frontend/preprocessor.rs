//! The Preprocessor Observer: include directives, macro definitions, and
//! macro expansions, all restricted to the main file.

use clang::{Entity, EntityKind, Token, TokenKind, TranslationUnit};

use hipify_core::edit::Edit;
use hipify_core::text;

use super::token_rewrite::{rewrite_token, TokenShape, TokenSite};
use super::{file_offset, FrontendContext};
use crate::diagnostics::Diagnostic;

/// Dispatch `entity` to whichever preprocessor callback handles its kind.
/// Returns `true` if this module owns the entity (whether or not it did
/// anything with it), so the caller's AST dispatcher doesn't also try.
pub fn try_handle(entity: &Entity, tu: &TranslationUnit, ctx: &mut FrontendContext) -> bool {
    match entity.get_kind() {
        EntityKind::InclusionDirective => {
            handle_inclusion_directive(entity, ctx);
            true
        }
        EntityKind::MacroDefinition => {
            handle_macro_definition(entity, tu, ctx);
            true
        }
        EntityKind::MacroExpansion => {
            handle_macro_expansion(entity, tu, ctx);
            true
        }
        _ => false,
    }
}

fn token_shape(token: &Token) -> TokenShape {
    match token.get_kind() {
        TokenKind::Identifier => TokenShape::Identifier,
        TokenKind::Literal if token.get_spelling().contains('"') => TokenShape::StringLiteral,
        _ => TokenShape::Other,
    }
}

fn handle_inclusion_directive(entity: &Entity, ctx: &mut FrontendContext) {
    let Some(name) = entity.get_name() else {
        return;
    };
    let Some(range) = entity.get_range() else {
        return;
    };
    let (Some(start), Some(end)) = (
        file_offset(range.get_start().get_file_location(), ctx.file),
        file_offset(range.get_end().get_file_location(), ctx.file),
    ) else {
        return;
    };
    let Some(raw) = text::extract_span(ctx.content, start, end) else {
        return;
    };
    let Ok(raw_str) = std::str::from_utf8(raw) else {
        return;
    };

    // Only angle-bracket includes are in scope; quote-delimited includes of
    // user headers are left untouched.
    let (Some(open), Some(close)) = (raw_str.find('<'), raw_str.rfind('>')) else {
        return;
    };
    if close <= open {
        return;
    }

    let name_start = start + open + 1;
    let name_len = close - open - 1;

    let Some(entry) = ctx.tables.lookup_include(&name) else {
        return;
    };
    if entry.unsupported {
        ctx.diagnostics
            .push(Diagnostic::unsupported_header(ctx.file, ctx.content, name_start, &name));
    } else {
        ctx.insert_edit(Edit::new(
            name_start as u32,
            name_len as u32,
            entry.dst_name.clone(),
        ));
    }
    ctx.stats.record(&name, entry.conv_type, entry.api_family, entry.unsupported);
}

fn handle_macro_definition(entity: &Entity, tu: &TranslationUnit, ctx: &mut FrontendContext) {
    let Some(name) = entity.get_name() else {
        return;
    };
    let Some(range) = entity.get_range() else {
        return;
    };
    let tokens = range.tokenize(tu);

    // Skip past the macro name; if the very next token is `(` with no
    // intervening whitespace, this is a function-like macro and we also
    // skip its parameter list before treating the remainder as the body.
    let Some(name_idx) = tokens.iter().position(|t| t.get_spelling() == name) else {
        return;
    };
    let mut body_start = name_idx + 1;
    if tokens.get(body_start).map(|t| t.get_spelling()) == Some("(".to_string()) {
        let mut depth = 0i32;
        for (i, t) in tokens.iter().enumerate().skip(body_start) {
            match t.get_spelling().as_str() {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        body_start = i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    for token in &tokens[body_start.min(tokens.len())..] {
        rewrite_one(token, ctx);
    }
}

fn handle_macro_expansion(entity: &Entity, tu: &TranslationUnit, ctx: &mut FrontendContext) {
    let Some(name) = entity.get_name() else {
        return;
    };
    let Some(location) = entity.get_location() else {
        return;
    };
    let Some(name_offset) = file_offset(location.get_file_location(), ctx.file) else {
        return;
    };

    rewrite_token(
        &TokenSite {
            spelling: &name,
            offset: name_offset as u32,
            shape: TokenShape::Identifier,
        },
        ctx,
    );

    let Some(range) = entity.get_range() else {
        return;
    };
    let tokens = range.tokenize(tu);
    let Some(open_paren) = tokens.iter().position(|t| t.get_spelling() == "(") else {
        // Object-like macro, or a function-like macro used without
        // parens in this expansion; no arguments to re-lex.
        return;
    };

    // Re-lex each unexpanded argument: split the parenthesized token run on
    // top-level commas and apply Token Rewrite to every constituent token.
    let mut depth = 0i32;
    let mut arg_tokens: Vec<&Token> = Vec::new();
    for token in &tokens[open_paren..] {
        match token.get_spelling().as_str() {
            "(" => {
                depth += 1;
                if depth == 1 {
                    continue;
                }
            }
            ")" => {
                depth -= 1;
                if depth == 0 {
                    flush_argument(&arg_tokens, ctx);
                    break;
                }
            }
            "," if depth == 1 => {
                flush_argument(&arg_tokens, ctx);
                arg_tokens.clear();
                continue;
            }
            _ => {}
        }
        arg_tokens.push(token);
    }
}

fn flush_argument(arg_tokens: &[&Token], ctx: &mut FrontendContext) {
    for token in arg_tokens {
        rewrite_one(token, ctx);
    }
}

fn rewrite_one(token: &Token, ctx: &mut FrontendContext) {
    let shape = token_shape(token);
    if shape == TokenShape::Other {
        return;
    }
    let Some(offset) = file_offset(token.get_location().get_file_location(), ctx.file) else {
        return;
    };
    let spelling = token.get_spelling();
    rewrite_token(
        &TokenSite {
            spelling: &spelling,
            offset: offset as u32,
            shape,
        },
        ctx,
    );
}

//! The AST Match Dispatcher: call expressions, type locations, string
//! literals, launch-syntax calls, builtin-member accesses, enum-constant
//! references, and shared-incomplete-array declarations.
//!
//! Handlers run in a fixed order per node kind; for `CallExpr` nodes the
//! launch-syntax handler gets first refusal (libclang has no dedicated
//! cursor kind for `<<<...>>>`, so it is recognized by token lookahead on an
//! ordinary call expression) before falling back to the plain call handler.

use clang::{Entity, EntityKind, TranslationUnit, TypeKind};

use hipify_core::edit::Edit;
use hipify_core::rename_table::{ApiFamily, ConvType};
use hipify_core::string_rewriter;
use hipify_core::text;

use super::{file_offset, read_range, write_range, FrontendContext};
use crate::diagnostics::Diagnostic;

/// Struct-name prefix libclang reports for the compiler-synthesized
/// thread/block/grid builtin types (`threadIdx`, `blockIdx`, ...).
const BUILTIN_STRUCT_PREFIX: &str = "__cuda_builtin_";
/// Fixed prefix on the accessor member libclang exposes for each builtin
/// component (`__fetch_builtin_x` etc.).
const FETCH_BUILTIN_PREFIX: &str = "__fetch_builtin_";

pub fn try_handle(entity: &Entity, tu: &TranslationUnit, ctx: &mut FrontendContext) -> bool {
    match entity.get_kind() {
        EntityKind::CallExpr => try_launch(entity, ctx).unwrap_or(false) || try_call(entity, ctx),
        EntityKind::TypeRef => try_type(entity, ctx),
        EntityKind::MemberRefExpr => try_builtin_member(entity, ctx),
        EntityKind::DeclRefExpr => try_enum_constant(entity, ctx),
        EntityKind::VarDecl => try_shared_array(entity, ctx),
        EntityKind::StringLiteral => try_string_literal(entity, ctx),
        _ => {
            let _ = tu;
            false
        }
    }
}

fn try_type(entity: &Entity, ctx: &mut FrontendContext) -> bool {
    let Some(ty) = entity.get_type() else {
        return false;
    };
    let mut printed = ty.get_display_name();
    for prefix in ["enum ", "struct "] {
        if let Some(stripped) = printed.strip_prefix(prefix) {
            printed = stripped.to_string();
            break;
        }
    }
    let Some(entry) = ctx.tables.lookup_type(&printed) else {
        return false;
    };
    let Some(location) = entity.get_location() else {
        return true;
    };
    let Some(offset) = file_offset(location.get_file_location(), ctx.file) else {
        return true;
    };
    if entry.unsupported {
        ctx.diagnostics
            .push(Diagnostic::unsupported_reference(ctx.file, ctx.content, offset, &printed));
    } else {
        ctx.insert_edit(Edit::new(offset as u32, printed.len() as u32, entry.dst_name.clone()));
    }
    ctx.stats.record(&printed, entry.conv_type, entry.api_family, entry.unsupported);
    true
}

fn try_call(entity: &Entity, ctx: &mut FrontendContext) -> bool {
    let Some(name) = entity.get_name() else {
        return false;
    };
    if !name.starts_with(ctx.tables.identifier_prefix()) || name.starts_with(FETCH_BUILTIN_PREFIX) {
        return false;
    }
    let Some(location) = entity.get_location() else {
        return true;
    };
    let Some(offset) = file_offset(location.get_file_location(), ctx.file) else {
        return true;
    };

    match ctx.tables.lookup_ident(&name) {
        None => {
            ctx.diagnostics.push(Diagnostic::unrecognized_reference(
                ctx.file,
                ctx.content,
                offset,
                &name,
                "function call",
            ));
        }
        Some(entry) => {
            if entry.unsupported {
                ctx.diagnostics
                    .push(Diagnostic::unsupported_reference(ctx.file, ctx.content, offset, &name));
            } else {
                ctx.insert_edit(Edit::new(offset as u32, name.len() as u32, entry.dst_name.clone()));
            }
            ctx.stats.record(&name, entry.conv_type, entry.api_family, entry.unsupported);
        }
    }
    true
}

fn try_builtin_member(entity: &Entity, ctx: &mut FrontendContext) -> bool {
    let children = entity.get_children();
    let Some(base) = children.first() else {
        return false;
    };
    let Some(base_type) = base.get_type() else {
        return false;
    };
    if !base_type.get_display_name().starts_with(BUILTIN_STRUCT_PREFIX) {
        return false;
    }
    let Some(decl_name) = base.get_name() else {
        return false;
    };
    let Some(member_name) = entity.get_name() else {
        return false;
    };
    let component = member_name
        .strip_prefix(FETCH_BUILTIN_PREFIX)
        .unwrap_or(&member_name);
    let candidate = format!("{decl_name}.{component}");

    let Some(location) = entity.get_location() else {
        return true;
    };
    let Some(offset) = file_offset(location.get_file_location(), ctx.file) else {
        return true;
    };

    match ctx.tables.lookup_ident(&candidate) {
        None => {
            ctx.diagnostics.push(Diagnostic::unrecognized_reference(
                ctx.file,
                ctx.content,
                offset,
                &candidate,
                "builtin member",
            ));
        }
        Some(entry) => {
            if entry.unsupported {
                ctx.diagnostics
                    .push(Diagnostic::unsupported_reference(ctx.file, ctx.content, offset, &candidate));
            } else {
                ctx.insert_edit(Edit::new(
                    offset as u32,
                    candidate.len() as u32,
                    entry.dst_name.clone(),
                ));
            }
            ctx.stats.record(&candidate, entry.conv_type, entry.api_family, entry.unsupported);
        }
    }
    true
}

fn try_enum_constant(entity: &Entity, ctx: &mut FrontendContext) -> bool {
    let Some(referenced) = entity.get_reference() else {
        return false;
    };
    if referenced.get_kind() != EntityKind::EnumConstantDecl {
        return false;
    }
    let Some(name) = entity.get_name() else {
        return false;
    };
    if !name.starts_with(ctx.tables.identifier_prefix()) {
        return false;
    }
    let Some(location) = entity.get_location() else {
        return true;
    };
    let Some(offset) = file_offset(location.get_file_location(), ctx.file) else {
        return true;
    };

    match ctx.tables.lookup_ident(&name) {
        None => {
            ctx.diagnostics.push(Diagnostic::unrecognized_reference(
                ctx.file,
                ctx.content,
                offset,
                &name,
                "enum constant",
            ));
        }
        Some(entry) => {
            if entry.unsupported {
                ctx.diagnostics
                    .push(Diagnostic::unsupported_reference(ctx.file, ctx.content, offset, &name));
            } else {
                ctx.insert_edit(Edit::new(offset as u32, name.len() as u32, entry.dst_name.clone()));
            }
            ctx.stats.record(&name, entry.conv_type, entry.api_family, entry.unsupported);
        }
    }
    true
}

fn try_shared_array(entity: &Entity, ctx: &mut FrontendContext) -> bool {
    let Some(ty) = entity.get_type() else {
        return false;
    };
    if ty.get_kind() != TypeKind::IncompleteArray {
        return false;
    }
    let Some(range) = entity.get_range() else {
        return false;
    };
    let Some((start, end)) = read_range(&range, ctx.file) else {
        return false;
    };
    let Some(raw) = text::extract_span(ctx.content, start, end) else {
        return false;
    };
    let Ok(raw_str) = std::str::from_utf8(raw) else {
        return false;
    };
    if !raw_str.contains("__shared__") {
        return false;
    }

    let Some(name) = entity.get_name() else {
        return false;
    };
    let element_type = ty
        .get_element_type()
        .map(|t| t.get_display_name())
        .unwrap_or_else(|| "char".to_string());

    let Some((wstart, wend)) = write_range(&range, ctx.file) else {
        return true;
    };
    let replacement = format!("HIP_DYNAMIC_SHARED({element_type}, {name})");
    ctx.insert_edit(Edit::new(wstart as u32, (wend - wstart) as u32, replacement));
    ctx.stats.record(&name, ConvType::Other, ApiFamily::Runtime, false);
    true
}

fn try_string_literal(entity: &Entity, ctx: &mut FrontendContext) -> bool {
    let Some(range) = entity.get_range() else {
        return false;
    };
    let Some((start, end)) = read_range(&range, ctx.file) else {
        return false;
    };
    let Some(raw) = text::extract_span(ctx.content, start, end) else {
        return false;
    };
    let Ok(raw_str) = std::str::from_utf8(raw) else {
        return false;
    };
    if !string_rewriter::is_narrow_literal(raw_str) {
        return true;
    }
    let body = raw_str
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw_str);
    let body_start = start + 1;
    let edits = string_rewriter::rewrite_string_literal(body, body_start as u32, ctx.tables, ctx.stats);
    for edit in edits {
        ctx.insert_edit(edit);
    }
    true
}

/// Try to recognize `entity` as a launch-syntax call. Returns `Some(true)`
/// if it was, `Some(false)`/`None` if this node should fall through to the
/// ordinary call handler.
fn try_launch(entity: &Entity, ctx: &mut FrontendContext) -> Option<bool> {
    let range = entity.get_range()?;
    let (rstart, rend) = read_range(&range, ctx.file)?;
    let raw = text::extract_span(ctx.content, rstart, rend)?;
    let source = std::str::from_utf8(raw).ok()?;

    let chevron_open = source.find("<<<")?;
    let after_open = &source[chevron_open + 3..];
    let chevron_close_rel = after_open.find(">>>")?;
    let chevron_close = chevron_open + 3 + chevron_close_rel;

    let callee_text = source[..chevron_open].trim();
    let config_text = &source[chevron_open + 3..chevron_close];
    let after_chevron = &source[chevron_close + 3..];
    let args_open = after_chevron.find('(')?;
    let args_close = after_chevron.rfind(')')?;
    let args_text = after_chevron[args_open + 1..args_close].trim();

    let config_parts = split_top_level_commas(config_text);
    if config_parts.len() < 2 {
        return Some(false);
    }
    let grid = config_parts[0].trim();
    let block = config_parts[1].trim();
    let shared = config_parts
        .get(2)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or("0");
    let stream = config_parts
        .get(3)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or("0");

    let mut replacement = format!(
        "hipLaunchKernelGGL({callee_text}, dim3({grid}), dim3({block}), {shared}, {stream}"
    );
    if !args_text.is_empty() {
        replacement.push_str(", ");
        replacement.push_str(args_text);
    }
    replacement.push(')');

    let (wstart, wend) = write_range(&range, ctx.file)?;
    ctx.insert_edit(Edit::new(wstart as u32, (wend - wstart) as u32, replacement));
    ctx.stats.record(callee_text, ConvType::Kernel, ApiFamily::Runtime, false);
    Some(true)
}

fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_top_level_commas_ignores_nested() {
        let parts = split_top_level_commas("grid, block, f(a, b), 0");
        assert_eq!(parts, vec!["grid", " block", " f(a, b)", " 0"]);
    }

    #[test]
    fn split_top_level_commas_single_part() {
        assert_eq!(split_top_level_commas("grid"), vec!["grid"]);
    }
}

//! Core infrastructure for hipify-rs.
//!
//! This crate provides the parts of the rewrite engine that don't need a
//! C++ front end:
//! - Rename tables (the static SRC -> DST vocabulary)
//! - The edit/replacement model (`Edit`, `ReplacementSet`)
//! - Per-file statistics collection
//! - The string-literal rewriter
//! - A unified error type
//!
//! The preprocessor observer and AST match dispatcher, which do need a C++
//! front end, live in the `hipify-rs` binary crate so that this crate stays
//! free of a `clang`/`libclang` dependency.

pub mod edit;
pub mod error;
pub mod rename_table;
pub mod stats;
pub mod string_rewriter;
pub mod text;

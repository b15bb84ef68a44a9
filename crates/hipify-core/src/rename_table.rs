//! The static SRC -> DST rename table.
//!
//! Three independent read-only maps (`IDENT`, `TYPE`, `INCLUDE`), each keyed
//! by SRC spelling. They are independent rather than a single union because
//! name spaces collide: an identifier and a type name can share spelling
//! (e.g. a stream handle type name also usable as a constructor-like call)
//! but are looked up at different AST sites.
//!
//! `RenameEntry` is a single tagged record, not a variant class hierarchy:
//! conversion kind and API family are plain enum tags and
//! `unsupported` is a flag, not a separate "unsupported entry" type.

use std::collections::HashMap;

mod data;

/// What kind of site a rename entry was recognized at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConvType {
    Kernel,
    Memory,
    Include,
    Literal,
    Type,
    Device,
    Stream,
    Event,
    Numeric,
    Texture,
    Module,
    Occupancy,
    Error,
    Other,
}

impl ConvType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConvType::Kernel => "kernel",
            ConvType::Memory => "memory",
            ConvType::Include => "include",
            ConvType::Literal => "literal",
            ConvType::Type => "type",
            ConvType::Device => "device",
            ConvType::Stream => "stream",
            ConvType::Event => "event",
            ConvType::Numeric => "numeric",
            ConvType::Texture => "texture",
            ConvType::Module => "module",
            ConvType::Occupancy => "occupancy",
            ConvType::Error => "error",
            ConvType::Other => "other",
        }
    }
}

/// Which vendor API family a rename entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiFamily {
    Runtime,
    Driver,
    Blas,
    Rand,
    Dnn,
    Sparse,
    Solver,
    Fft,
}

impl ApiFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiFamily::Runtime => "runtime",
            ApiFamily::Driver => "driver",
            ApiFamily::Blas => "blas",
            ApiFamily::Rand => "rand",
            ApiFamily::Dnn => "dnn",
            ApiFamily::Sparse => "sparse",
            ApiFamily::Solver => "solver",
            ApiFamily::Fft => "fft",
        }
    }
}

/// One row of the rename table: the DST replacement plus its tags.
///
/// Immutable once built; lookups return a shared reference, never a mutable
/// one — nothing in this crate ever rewrites a `RenameEntry` after the
/// tables are constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    pub dst_name: String,
    pub conv_type: ConvType,
    pub api_family: ApiFamily,
    /// If true, this entry exists only to produce a diagnostic: the
    /// construct is recognized but has no DST equivalent.
    pub unsupported: bool,
}

impl RenameEntry {
    pub fn new(
        dst_name: impl Into<String>,
        conv_type: ConvType,
        api_family: ApiFamily,
    ) -> Self {
        RenameEntry {
            dst_name: dst_name.into(),
            conv_type,
            api_family,
            unsupported: false,
        }
    }

    pub fn unsupported(conv_type: ConvType, api_family: ApiFamily) -> Self {
        RenameEntry {
            dst_name: String::new(),
            conv_type,
            api_family,
            unsupported: true,
        }
    }
}

/// The three independent rename maps, built once and read-only thereafter.
#[derive(Debug, Default)]
pub struct RenameTables {
    ident: HashMap<String, RenameEntry>,
    ty: HashMap<String, RenameEntry>,
    include: HashMap<String, RenameEntry>,
}

impl RenameTables {
    /// Build an empty table set (useful for tests that only need a handful
    /// of entries).
    pub fn empty() -> Self {
        RenameTables::default()
    }

    /// Build the default table set shipped with this crate.
    ///
    /// The table content itself is data (see `rename_table::data`), not
    /// core logic; a consumer embedding this crate in a different context
    /// could substitute an entirely different `RenameTables` built from a
    /// different data source.
    pub fn default_tables() -> Self {
        let mut tables = RenameTables::default();
        for (src, entry) in data::identifiers() {
            tables.ident.insert(src.to_string(), entry);
        }
        for (src, entry) in data::types() {
            tables.ty.insert(src.to_string(), entry);
        }
        for (src, entry) in data::includes() {
            tables.include.insert(src.to_string(), entry);
        }
        tables
    }

    pub fn insert_ident(&mut self, src: impl Into<String>, entry: RenameEntry) {
        self.ident.insert(src.into(), entry);
    }

    pub fn insert_type(&mut self, src: impl Into<String>, entry: RenameEntry) {
        self.ty.insert(src.into(), entry);
    }

    pub fn insert_include(&mut self, src: impl Into<String>, entry: RenameEntry) {
        self.include.insert(src.into(), entry);
    }

    pub fn lookup_ident(&self, src: &str) -> Option<&RenameEntry> {
        self.ident.get(src)
    }

    pub fn lookup_type(&self, src: &str) -> Option<&RenameEntry> {
        self.ty.get(src)
    }

    pub fn lookup_include(&self, src: &str) -> Option<&RenameEntry> {
        self.include.get(src)
    }

    /// The two-character prefix used to anchor string-literal candidate
    /// scanning. Derived from the shortest identifier key that
    /// looks like the vendor tag, falling back to the data module's
    /// declared prefix.
    pub fn identifier_prefix(&self) -> &'static str {
        data::IDENTIFIER_PREFIX
    }

    /// The DST runtime header prepended once any edit is produced.
    pub fn runtime_header_include(&self) -> &'static str {
        data::RUNTIME_HEADER_INCLUDE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_resolve_known_entries() {
        let tables = RenameTables::default_tables();
        let entry = tables.lookup_ident("cudaMalloc").expect("present");
        assert_eq!(entry.dst_name, "hipMalloc");
        assert!(!entry.unsupported);

        let ty = tables.lookup_type("cudaError_t").expect("present");
        assert_eq!(ty.dst_name, "hipError_t");

        let inc = tables.lookup_include("cuda_runtime.h").expect("present");
        assert_eq!(inc.dst_name, "hip/hip_runtime.h");
    }

    #[test]
    fn unknown_name_is_absent_not_unsupported() {
        let tables = RenameTables::default_tables();
        assert!(tables.lookup_ident("totallyUnknownSymbol").is_none());
    }

    #[test]
    fn ident_and_type_tables_are_independent() {
        // cudaStream_t exists in both IDENT (constructor-style use sites are
        // rare but the entry may still be registered there by a future
        // table) and TYPE; inserting in one must not affect the other.
        let mut tables = RenameTables::empty();
        tables.insert_type(
            "cudaStream_t",
            RenameEntry::new("hipStream_t", ConvType::Type, ApiFamily::Runtime),
        );
        assert!(tables.lookup_ident("cudaStream_t").is_none());
        assert!(tables.lookup_type("cudaStream_t").is_some());
    }

    #[test]
    fn runtime_header_include_is_stable() {
        let tables = RenameTables::default_tables();
        assert_eq!(tables.runtime_header_include(), "hip/hip_runtime.h");
    }
}

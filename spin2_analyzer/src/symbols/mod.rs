//! Symbol table for Spin2 documents
//!
//! Holds global declarations, per-method scopes (parameters, returns, locals
//! and inline assembly labels), structure definitions and the object import
//! directory. Every scope keeps the first declaration of a name.

pub mod error;
pub mod structures;
pub mod symbol;
pub mod table;

pub use error::{SymbolError, SymbolResult};
pub use structures::{ArraySize, MemberType, StructureDef, StructureMember};
pub use symbol::{Attachment, Symbol, SymbolKind};
pub use table::{MethodSignature, ObjectImport, PublicSymbolTable, SymbolTable};

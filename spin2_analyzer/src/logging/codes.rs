//! Consolidated error codes and classification system
//!
//! Single source of truth for all codes and their metadata. Host failures
//! (file access, threads) and language diagnostics share the same registry so
//! both flow through the same logging and reporting paths.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Code {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Declaration (pass 1) diagnostic codes
pub mod declarations {
    use super::Code;

    pub const DUPLICATE_DECLARATION: Code = Code::new("E050");
    pub const DUPLICATE_METHOD: Code = Code::new("E051");
    pub const DUPLICATE_STRUCTURE: Code = Code::new("E052");
    pub const DUPLICATE_MEMBER: Code = Code::new("E053");
    pub const MALFORMED_DECLARATION: Code = Code::new("E054");
    pub const INVALID_FILENAME: Code = Code::new("E055");
    pub const MISSING_OBJECT_FILE: Code = Code::new("E056");
    pub const MISSING_DATA_FILE: Code = Code::new("E057");
    pub const PARAMETER_DEFAULT: Code = Code::new("E058");
    pub const HIDES_GLOBAL: Code = Code::new("E059");
    pub const SYMBOL_LIMIT_EXCEEDED: Code = Code::new("E060");
}

/// Reference resolution (pass 2) diagnostic codes
pub mod references {
    use super::Code;

    pub const MISSING_DECLARATION: Code = Code::new("E110");
    pub const MISSING_PARENS: Code = Code::new("E111");
    pub const UNKNOWN_MEMBER: Code = Code::new("E112");
    pub const MISSING_OBJECT_INSTANCE: Code = Code::new("E113");
    pub const OBJECT_MEMBER_NOT_FOUND: Code = Code::new("E114");
    pub const UNKNOWN_DISPLAY_TYPE: Code = Code::new("E115");
    pub const METHOD_REQUIRES_PARENS: Code = Code::new("E116");
}

/// Legacy dialect and unsupported-syntax codes
pub mod dialect {
    use super::Code;

    pub const P1_SYNTAX: Code = Code::new("E130");
    pub const P1_INSTRUCTION: Code = Code::new("E131");
    pub const P1_NAME: Code = Code::new("E132");
    pub const ILLEGAL_INLINE_DIRECTIVE: Code = Code::new("E133");
    pub const ILLEGAL_ELSE_IF: Code = Code::new("E134");
    pub const UNSUPPORTED_PREPROCESSOR: Code = Code::new("E135");
    pub const P1_LOCAL_LABEL: Code = Code::new("E136");
}

/// Object import graph codes
pub mod namespaces {
    use super::Code;

    pub const CYCLIC_OBJECT_REFERENCE: Code = Code::new("E140");
    pub const NESTING_TOO_DEEP: Code = Code::new("E141");
}

/// Directory batch codes
pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E150");
    pub const NO_FILES_FOUND: Code = Code::new("E151");
    pub const TOO_MANY_FILES: Code = Code::new("E152");
    pub const THREAD_FAILURE: Code = Code::new("E153");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FILE_DISCOVERY_COMPLETE: Code = Code::new("I007");
    pub const DECLARATION_SCAN_COMPLETE: Code = Code::new("I050");
    pub const REFERENCE_RESOLUTION_COMPLETE: Code = Code::new("I060");
    pub const ANALYSIS_COMPLETE: Code = Code::new("I070");
    pub const WORKSPACE_ANALYSIS_COMPLETE: Code = Code::new("I080");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

type Entry = (
    &'static str,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

#[rustfmt::skip]
const REGISTRY_ENTRIES: &[Entry] = &[
    // code, category, severity, recoverable, requires_halt, description, action
    ("ERR001", "System", Severity::Critical, false, true, "Critical internal error", "File a bug report with the input that triggered it"),
    ("ERR002", "System", Severity::Critical, false, true, "Logging or runtime initialization failed", "Check configuration and environment variables"),
    ("ERR003", "System", Severity::High, false, true, "Runtime configuration could not be loaded", "Fix the configuration file or remove it"),

    ("E005", "FileProcessing", Severity::High, false, false, "Source file not found", "Check the path"),
    ("E006", "FileProcessing", Severity::Medium, true, false, "File does not have a .spin2 extension", "Rename the file or disable the extension check"),
    ("E007", "FileProcessing", Severity::High, false, false, "File exceeds the maximum size", "Split the source or raise max_file_size"),
    ("E008", "FileProcessing", Severity::Low, true, false, "File is empty", "Nothing to analyze"),
    ("E009", "FileProcessing", Severity::High, false, false, "Permission denied reading file", "Check file permissions"),
    ("E010", "FileProcessing", Severity::High, false, false, "File is not valid UTF-8", "Re-save the source as UTF-8"),
    ("E011", "FileProcessing", Severity::High, false, false, "I/O error while reading file", "Retry; check the device"),
    ("E012", "FileProcessing", Severity::Medium, false, false, "Invalid path", "Pass a path to a regular file"),
    ("E013", "FileProcessing", Severity::High, false, false, "File exceeds the maximum line count", "Split the source or raise max_line_count"),

    ("E050", "Declarations", Severity::High, true, false, "Name declared twice in the same scope", "Rename or remove the second declaration"),
    ("E051", "Declarations", Severity::High, true, false, "Method declared twice", "Rename one of the methods"),
    ("E052", "Declarations", Severity::High, true, false, "Structure declared twice", "Rename one of the structures"),
    ("E053", "Declarations", Severity::High, true, false, "Structure member declared twice", "Rename the member"),
    ("E054", "Declarations", Severity::High, true, false, "Declaration could not be parsed", "Check the declaration syntax"),
    ("E055", "Declarations", Severity::Medium, true, false, "Filename contains an illegal character", "Use a bare filename"),
    ("E056", "Declarations", Severity::Medium, true, false, "Object file not found", "Add the file or fix the name"),
    ("E057", "Declarations", Severity::Medium, true, false, "Data file not found", "Add the file or fix the name"),
    ("E058", "Declarations", Severity::Medium, true, false, "Parameter default values are not supported", "Remove the default value"),
    ("E059", "Declarations", Severity::Low, true, false, "Local name hides a global name", "Rename the local to avoid confusion"),
    ("E060", "Declarations", Severity::High, true, false, "Symbol table limit exceeded", "Reduce the number of declarations"),

    ("E110", "References", Severity::High, true, false, "Name is not declared", "Declare the name or fix the spelling"),
    ("E111", "References", Severity::Medium, true, false, "Built-in method used without parentheses", "Add ()"),
    ("E112", "References", Severity::High, true, false, "Structure has no such member", "Check the structure definition"),
    ("E113", "References", Severity::High, true, false, "Object instance not declared", "Declare the instance in an OBJ block"),
    ("E114", "References", Severity::High, true, false, "Object does not export the member", "Check the object's public names"),
    ("E115", "References", Severity::Medium, true, false, "Unknown debug display type", "Use a supported display type"),
    ("E116", "References", Severity::Medium, true, false, "Method used without call parentheses", "Add () or take its address with @"),

    ("E130", "Dialect", Severity::High, true, false, "P1 syntax is not valid in P2", "Convert to P2 syntax"),
    ("E131", "Dialect", Severity::High, true, false, "P1 assembly instruction or effect", "Use the P2 equivalent"),
    ("E132", "Dialect", Severity::High, true, false, "P1-only name", "Use the P2 equivalent"),
    ("E133", "Dialect", Severity::High, true, false, "Directive not allowed in inline assembly", "Move the code to a DAT block"),
    ("E134", "Dialect", Severity::Medium, true, false, "'else if' is not valid Spin2", "Use ELSEIF"),
    ("E135", "Dialect", Severity::Medium, true, false, "Preprocessor directive not supported", "Enable flexspin directives or remove the line"),
    ("E136", "Dialect", Severity::High, true, false, "P1 ':' local label", "Use a '.' local label"),

    ("E140", "Namespaces", Severity::High, true, false, "Objects import each other in a cycle", "Break the cycle"),
    ("E141", "Namespaces", Severity::High, true, false, "Object nesting exceeds the limit", "Flatten the object hierarchy"),

    ("E150", "Batch", Severity::High, false, true, "Directory not found", "Check the path"),
    ("E151", "Batch", Severity::Low, true, false, "No .spin2 files found", "Check the directory"),
    ("E152", "Batch", Severity::Medium, true, false, "Too many files for one batch", "Narrow the directory"),
    ("E153", "Batch", Severity::Critical, false, true, "Worker thread failed", "File a bug report"),

    ("I001", "Success", Severity::Low, true, false, "Operation completed", "None"),
    ("I004", "Success", Severity::Low, true, false, "System initialized", "None"),
    ("I006", "Success", Severity::Low, true, false, "File processed", "None"),
    ("I007", "Success", Severity::Low, true, false, "File discovery completed", "None"),
    ("I050", "Success", Severity::Low, true, false, "Declaration scan completed", "None"),
    ("I060", "Success", Severity::Low, true, false, "Reference resolution completed", "None"),
    ("I070", "Success", Severity::Low, true, false, "Document analysis completed", "None"),
    ("I080", "Success", Severity::Low, true, false, "Workspace analysis completed", "None"),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

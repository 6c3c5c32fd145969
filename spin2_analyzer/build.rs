// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    symbols: SymbolLimits,
    diagnostics: DiagnosticLimits,
    namespaces: NamespaceLimits,
    batch_processing: BatchProcessingLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    max_line_count: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_continuation_lines: usize,
}

#[derive(serde::Deserialize)]
struct SymbolLimits {
    max_symbol_name_length: usize,
    max_global_symbols: usize,
    max_locals_per_method: usize,
}

#[derive(serde::Deserialize)]
struct DiagnosticLimits {
    max_diagnostics: usize,
}

#[derive(serde::Deserialize)]
struct NamespaceLimits {
    max_object_nesting_depth: usize,
}

#[derive(serde::Deserialize)]
struct BatchProcessingLimits {
    max_worker_threads: usize,
    max_files_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SPIN2_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=SPIN2_CONFIG_DIR");

    let profile = env::var("SPIN2_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("SPIN2_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of spin2_analyzer directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 100_000_000;
    const ABSOLUTE_MAX_NESTING_DEPTH: usize = 64;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    // Spin2 symbol names are at most 32 characters
    if config.symbols.max_symbol_name_length == 0 || config.symbols.max_symbol_name_length > 32 {
        panic!("LIMITS: max_symbol_name_length must be within 1..=32");
    }

    if config.namespaces.max_object_nesting_depth > ABSOLUTE_MAX_NESTING_DEPTH {
        panic!("LIMITS: max_object_nesting_depth exceeds absolute maximum");
    }

    if config.diagnostics.max_diagnostics == 0 {
        panic!("LIMITS: max_diagnostics must be positive");
    }

    if config.lexical.max_continuation_lines < 2 {
        panic!("LIMITS: max_continuation_lines must allow at least two lines");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const MAX_LINE_COUNT: usize = {};
    }}

    pub mod lexical {{
        pub const MAX_CONTINUATION_LINES: usize = {};
    }}

    pub mod symbols {{
        pub const MAX_SYMBOL_NAME_LENGTH: usize = {};
        pub const MAX_GLOBAL_SYMBOLS: usize = {};
        pub const MAX_LOCALS_PER_METHOD: usize = {};
    }}

    pub mod diagnostics {{
        pub const MAX_DIAGNOSTICS: usize = {};
    }}

    pub mod namespaces {{
        pub const MAX_OBJECT_NESTING_DEPTH: usize = {};
    }}

    pub mod batch_processing {{
        pub const MAX_WORKER_THREADS: usize = {};
        pub const MAX_FILES_PER_BATCH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.file_processing.max_file_size,
        config.file_processing.max_line_count,
        config.lexical.max_continuation_lines,
        config.symbols.max_symbol_name_length,
        config.symbols.max_global_symbols,
        config.symbols.max_locals_per_method,
        config.diagnostics.max_diagnostics,
        config.namespaces.max_object_nesting_depth,
        config.batch_processing.max_worker_threads,
        config.batch_processing.max_files_per_batch,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}

//! Table-driven classification of reserved Spin2 and PASM2 names
//!
//! Every reserved lexeme maps to exactly one `BuiltinCategory` plus the
//! language version that introduced it. Lookups lower-case the lexeme once and
//! hit a single map; the predicates below are thin views over those maps.

pub mod debug_display;
mod tables;

pub use debug_display::{
    display_type_for, is_debug_color, is_feed_parameter, is_setup_parameter, DebugDisplayType,
};

use crate::config::compile_time;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCategory {
    BlockName,
    StorageType,
    Alignment,
    SpinReserved,
    SpinControlFlow,
    BinaryOperator,
    UnaryOperator,
    NumericSymbol,
    FloatConversion,
    ClockSymbol,
    CoginitSymbol,
    TaskSymbol,
    HubVariable,
    CogRegister,
    HardwareConstant,
    BuiltinMethod,
    MethodPointerOp,
    DebugMethod,
    DebugControlSymbol,
    DebugInvoke,
    DebugColor,
    PasmInstruction,
    PasmLangDirective,
    PasmEffect,
    PasmReserved,
    P1AsmInstruction,
    P1AsmEffect,
    P1AsmVariable,
    P1SpinMethod,
    P1SpinVariable,
    FlexspinDirective,
}

type CategoryMap = HashMap<String, (BuiltinCategory, u32)>;

/// Version 0 means no `{Spin2_v##}` directive was seen: every feature is on
pub fn version_allows(version: u32, gate: u32) -> bool {
    version == 0 || version >= gate
}

fn insert_all(map: &mut CategoryMap, names: &[&'static str], category: BuiltinCategory) {
    for name in names {
        map.entry(name.to_string()).or_insert((category, 0));
    }
}

fn spin_map() -> &'static CategoryMap {
    static MAP: OnceLock<CategoryMap> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = CategoryMap::new();
        for &(name, category, gate) in tables::SPIN_ENTRIES {
            map.entry(name.to_string()).or_insert((category, gate));
        }
        insert_all(&mut map, tables::HARDWARE_CONSTANTS, BuiltinCategory::HardwareConstant);
        map
    })
}

fn pasm_map() -> &'static CategoryMap {
    static MAP: OnceLock<CategoryMap> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = CategoryMap::new();
        insert_all(&mut map, tables::PASM_EFFECTS, BuiltinCategory::PasmEffect);
        insert_all(&mut map, tables::PASM_INSTRUCTIONS, BuiltinCategory::PasmInstruction);
        insert_all(&mut map, tables::PASM_RESERVED, BuiltinCategory::PasmReserved);
        insert_all(&mut map, tables::P1_ASM_INSTRUCTIONS, BuiltinCategory::P1AsmInstruction);
        insert_all(&mut map, tables::P1_ASM_EFFECTS, BuiltinCategory::P1AsmEffect);
        map
    })
}

fn debug_map() -> &'static CategoryMap {
    static MAP: OnceLock<CategoryMap> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = CategoryMap::new();
        for family in tables::DEBUG_NUMERIC_FAMILIES {
            for suffix in tables::DEBUG_FAMILY_SUFFIXES {
                map.insert(format!("{}{}", family, suffix), (BuiltinCategory::DebugMethod, 0));
            }
        }
        for &(name, gate) in tables::DEBUG_OTHER_METHODS {
            map.insert(name.to_string(), (BuiltinCategory::DebugMethod, gate));
        }
        insert_all(&mut map, tables::DEBUG_COLORS, BuiltinCategory::DebugColor);
        map
    })
}

fn p1_map() -> &'static CategoryMap {
    static MAP: OnceLock<CategoryMap> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = CategoryMap::new();
        insert_all(&mut map, tables::P1_SPIN_METHODS, BuiltinCategory::P1SpinMethod);
        insert_all(&mut map, tables::P1_SPIN_VARIABLES, BuiltinCategory::P1SpinVariable);
        insert_all(&mut map, tables::P1_ASM_VARIABLES, BuiltinCategory::P1AsmVariable);
        map
    })
}

fn lookup(map: &CategoryMap, lexeme: &str, version: u32) -> Option<BuiltinCategory> {
    let key = lexeme.to_ascii_lowercase();
    map.get(key.as_str())
        .filter(|(_, gate)| version_allows(version, *gate))
        .map(|(category, _)| *category)
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Category of a lexeme in Spin context (CON/VAR/OBJ/PUB/PRI and DAT data)
pub fn classify(lexeme: &str, version: u32) -> Option<BuiltinCategory> {
    if lexeme.starts_with('#') {
        return is_flexspin_directive(lexeme).then_some(BuiltinCategory::FlexspinDirective);
    }
    lookup(spin_map(), lexeme, version)
}

/// Category of a lexeme in assembly context; falls back to the Spin table
/// for names both dialects share (registers, operators, constants)
pub fn classify_pasm(lexeme: &str, version: u32) -> Option<BuiltinCategory> {
    lookup(pasm_map(), lexeme, version).or_else(|| classify(lexeme, version))
}

/// Category inside `debug(...)`: debug methods and colors, otherwise Spin
pub fn classify_debug(lexeme: &str, version: u32) -> Option<BuiltinCategory> {
    let trimmed = lexeme.strip_suffix('_').unwrap_or(lexeme);
    lookup(debug_map(), trimmed, version).or_else(|| classify(lexeme, version))
}

/// Legacy P1-only names: `cognew`, `result`, `cnt`, ...
pub fn classify_p1(lexeme: &str) -> Option<BuiltinCategory> {
    lookup(p1_map(), lexeme, 0)
}

// ============================================================================
// PREDICATES
// ============================================================================

pub fn is_storage_type(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "byte" | "word" | "long" | "bytefit" | "wordfit"
    )
}

pub fn is_alignment(name: &str) -> bool {
    classify(name, 0) == Some(BuiltinCategory::Alignment)
}

pub fn is_builtin_method(name: &str, version: u32) -> bool {
    classify(name, version) == Some(BuiltinCategory::BuiltinMethod)
}

/// Built-ins that are legal without a parenthesized argument list
pub fn is_no_paren_method(name: &str) -> bool {
    matches!(name.to_ascii_lowercase().as_str(), "recv" | "abort" | "return")
}

pub fn is_float_conversion(name: &str) -> bool {
    classify(name, 0) == Some(BuiltinCategory::FloatConversion)
}

pub fn is_pasm_condition(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("if_") || lower == "_ret_"
}

pub fn is_pasm_effect(name: &str) -> bool {
    lookup(pasm_map(), name, 0) == Some(BuiltinCategory::PasmEffect)
}

pub fn is_pasm_instruction(name: &str) -> bool {
    lookup(pasm_map(), name, 0) == Some(BuiltinCategory::PasmInstruction)
}

pub fn is_pasm_non_arg_instruction(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    tables::PASM_NON_ARG_INSTRUCTIONS.contains(&lower.as_str())
}

/// `ORG`, `END`, `FIT`, `DITTO` and friends
pub fn is_pasm_lang_directive(name: &str, version: u32) -> bool {
    classify(name, version) == Some(BuiltinCategory::PasmLangDirective)
}

pub fn is_illegal_inline_pasm_directive(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    tables::ILLEGAL_INLINE_DIRECTIVES.contains(&lower.as_str())
}

pub fn is_p1_asm_instruction(name: &str) -> bool {
    lookup(pasm_map(), name, 0) == Some(BuiltinCategory::P1AsmInstruction)
}

pub fn is_p1_asm_effect(name: &str) -> bool {
    lookup(pasm_map(), name, 0) == Some(BuiltinCategory::P1AsmEffect)
}

pub fn is_p1_asm_variable(name: &str) -> bool {
    classify_p1(name) == Some(BuiltinCategory::P1AsmVariable)
}

pub fn is_p1_spin_method(name: &str) -> bool {
    classify_p1(name) == Some(BuiltinCategory::P1SpinMethod)
}

pub fn is_flexspin_directive(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    tables::FLEXSPIN_DIRECTIVES.contains(&lower.as_str())
}

pub fn is_debug_invoke(name: &str) -> bool {
    classify(name, 0) == Some(BuiltinCategory::DebugInvoke)
}

pub fn is_debug_method(name: &str, version: u32) -> bool {
    classify_debug(name, version) == Some(BuiltinCategory::DebugMethod)
}

/// Whether the first word of a DAT or inline-assembly line is a label
/// rather than a condition, instruction or directive
pub fn is_dat_or_pasm_label(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '.' || first == ':') {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    if is_storage_type(&lower)
        || matches!(
            lower.as_str(),
            "res" | "file" | "dat" | "debug" | "org" | "orgf" | "orgh" | "fit" | "end" | "ditto"
                | "if_always" | "if_never"
        )
    {
        return false;
    }
    !(is_illegal_inline_pasm_directive(&lower)
        || is_pasm_condition(&lower)
        || is_pasm_effect(&lower)
        || is_pasm_instruction(&lower)
        || is_p1_asm_instruction(&lower))
}

// ============================================================================
// LEXICAL SHAPES
// ============================================================================

fn symbol_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid symbol regex"))
}

fn numeric_literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^(?:[0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][+-]?[0-9]+)?|\$[0-9A-Fa-f_]+|%%[0-3_]+|%[01_]+|%"[^"]*")$"#,
        )
        .expect("valid numeric regex")
    })
}

/// Identifier shape plus the language's name length limit
pub fn is_valid_symbol_name(name: &str) -> bool {
    name.len() <= compile_time::symbols::MAX_SYMBOL_NAME_LENGTH && symbol_name_regex().is_match(name)
}

pub fn is_numeric_literal(text: &str) -> bool {
    numeric_literal_regex().is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("REPEAT", 0), Some(BuiltinCategory::SpinReserved));
        assert_eq!(classify("PinWrite", 0), Some(BuiltinCategory::BuiltinMethod));
        assert_eq!(classify("myVariable", 0), None);
    }

    #[test]
    fn test_version_gates() {
        assert_eq!(classify("sizeof", 43), None);
        assert_eq!(classify("sizeof", 45), Some(BuiltinCategory::BuiltinMethod));
        assert_eq!(classify("sizeof", 0), Some(BuiltinCategory::BuiltinMethod));
        assert_eq!(classify("struct", 44), None);
        assert_eq!(classify("taskspin", 47), Some(BuiltinCategory::BuiltinMethod));
        assert_eq!(classify("pow", 50), None);
        assert_eq!(classify("ditto", 50), Some(BuiltinCategory::PasmLangDirective));
    }

    #[test]
    fn test_pasm_context_prefers_instructions() {
        assert_eq!(classify("and", 0), Some(BuiltinCategory::BinaryOperator));
        assert_eq!(classify_pasm("and", 0), Some(BuiltinCategory::PasmInstruction));
        assert_eq!(classify_pasm("wcz", 0), Some(BuiltinCategory::PasmEffect));
        assert_eq!(classify_pasm("_nc_and_z", 0), Some(BuiltinCategory::PasmReserved));
        assert_eq!(classify_pasm("ptra", 0), Some(BuiltinCategory::CogRegister));
        assert_eq!(classify_pasm("movd", 0), Some(BuiltinCategory::P1AsmInstruction));
    }

    #[test]
    fn test_debug_methods_expand_families() {
        assert_matches!(classify_debug("udec_long_array", 0), Some(BuiltinCategory::DebugMethod));
        assert_matches!(classify_debug("sbin_reg_array_", 0), Some(BuiltinCategory::DebugMethod));
        assert_matches!(classify_debug("bool", 43), None);
        assert_matches!(classify_debug("red", 0), Some(BuiltinCategory::DebugColor));
        assert_matches!(classify_debug("getct", 0), Some(BuiltinCategory::BuiltinMethod));
        assert!(is_debug_method("udec", 0));
        assert_eq!(classify("udec", 0), None);
    }

    #[test]
    fn test_p1_names() {
        assert_eq!(classify_p1("cognew"), Some(BuiltinCategory::P1SpinMethod));
        assert_eq!(classify_p1("RESULT"), Some(BuiltinCategory::P1SpinVariable));
        assert!(is_p1_asm_variable("cnt"));
        assert!(is_p1_asm_effect("nr"));
        assert!(!is_p1_spin_method("coginit"));
    }

    #[test]
    fn test_dat_label_detection() {
        assert!(is_dat_or_pasm_label("loop"));
        assert!(is_dat_or_pasm_label(".inner"));
        assert!(is_dat_or_pasm_label(":p1local"));
        assert!(!is_dat_or_pasm_label("mov"));
        assert!(!is_dat_or_pasm_label("if_c"));
        assert!(!is_dat_or_pasm_label("_ret_"));
        assert!(!is_dat_or_pasm_label("long"));
        assert!(!is_dat_or_pasm_label("debug"));
        assert!(!is_dat_or_pasm_label("ORG"));
        assert!(!is_dat_or_pasm_label("waitcnt"));
        assert!(!is_dat_or_pasm_label("1abc"));
    }

    #[test]
    fn test_pasm_helpers() {
        assert!(is_pasm_condition("IF_NC_AND_Z"));
        assert!(is_pasm_condition("_ret_"));
        assert!(is_pasm_non_arg_instruction("RET"));
        assert!(!is_pasm_non_arg_instruction("mov"));
        assert!(is_illegal_inline_pasm_directive("orgh"));
        assert!(is_flexspin_directive("#ifdef"));
        assert!(!is_flexspin_directive("#0"));
        assert_eq!(classify("#define", 0), Some(BuiltinCategory::FlexspinDirective));
    }

    #[test]
    fn test_symbol_name_shape() {
        assert!(is_valid_symbol_name("_clkFreq2"));
        assert!(!is_valid_symbol_name("2fast"));
        assert!(!is_valid_symbol_name("a_name_that_is_far_longer_than_32_chars"));
    }

    #[test]
    fn test_numeric_literals() {
        for literal in ["123", "1_000", "3.14", "1.0e-3", "$FF_00", "%1010", "%%3210", "%\"AB\""] {
            assert!(is_numeric_literal(literal), "{}", literal);
        }
        assert!(!is_numeric_literal("$G"));
        assert!(!is_numeric_literal("%2"));
        assert!(!is_numeric_literal("abc"));
    }

    #[test]
    fn test_storage_and_methods() {
        assert!(is_storage_type("LONG"));
        assert!(!is_storage_type("struct"));
        assert!(is_builtin_method("waitms", 0));
        assert!(is_no_paren_method("ABORT"));
        assert!(is_float_conversion("round"));
        assert!(is_alignment("alignl"));
        assert!(is_debug_invoke("debug_main"));
    }
}

//! Symbol table: globals, per-method scopes, structures and object imports

use super::error::{SymbolError, SymbolResult};
use super::structures::StructureDef;
use super::symbol::{Symbol, SymbolKind};
use crate::config::compile_time::symbols::{MAX_GLOBAL_SYMBOLS, MAX_LOCALS_PER_METHOD};
use crate::utils::Span;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Names are case-insensitive in every scope
fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// A PUB or PRI signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub name: String,
    pub is_public: bool,
    pub line: usize,
    pub column: usize,
    pub parameters: Vec<String>,
    pub returns: Vec<String>,
    pub locals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MethodSignature {
    pub fn new(name: &str, is_public: bool, line: usize, column: usize) -> Self {
        Self {
            name: name.to_string(),
            is_public,
            line,
            column,
            parameters: Vec::new(),
            returns: Vec::new(),
            locals: Vec::new(),
            comment: None,
        }
    }
}

/// One OBJ declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectImport {
    pub instance: String,
    pub filename: String,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_count: Option<String>,
    /// Constant names overridden with `| NAME = value`
    pub overrides: Vec<String>,
}

/// Structure type bound to a variable, parameter or label
#[derive(Debug, Clone, PartialEq, Eq)]
struct InstanceBinding {
    structure: String,
    pointer: bool,
}

/// Symbols one document exports to the objects that import it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublicSymbolTable {
    pub constants: BTreeMap<String, Symbol>,
    pub methods: BTreeMap<String, MethodSignature>,
    pub structures: BTreeMap<String, StructureDef>,
}

impl PublicSymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(&self, name: &str) -> Option<&Symbol> {
        self.constants.get(&key(name))
    }

    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.get(&key(name))
    }

    pub fn structure(&self, name: &str) -> Option<&StructureDef> {
        self.structures.get(&key(name))
    }

    pub fn len(&self) -> usize {
        self.constants.len() + self.methods.len() + self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_constant(&mut self, symbol: Symbol) {
        self.constants.entry(key(&symbol.name)).or_insert(symbol);
    }

    pub fn add_method(&mut self, signature: MethodSignature) {
        self.methods.entry(key(&signature.name)).or_insert(signature);
    }

    pub fn add_structure(&mut self, structure: StructureDef) {
        self.structures.entry(key(&structure.name)).or_insert(structure);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StructureAlias {
    name: String,
    target: String,
    line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    globals: HashMap<String, Symbol>,
    locals: HashMap<String, HashMap<String, Symbol>>,
    pasm_labels: HashMap<String, HashMap<String, Symbol>>,
    methods: HashMap<String, MethodSignature>,
    structures: HashMap<String, StructureDef>,
    aliases: HashMap<String, StructureAlias>,
    instances: HashMap<String, InstanceBinding>,
    local_instances: HashMap<String, HashMap<String, InstanceBinding>>,
    namespaces: HashMap<String, ObjectImport>,
    namespace_order: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    // Globals

    /// Declare a document-level name. A repeated name is rejected and the
    /// first declaration stays authoritative.
    pub fn declare_global(&mut self, symbol: Symbol) -> SymbolResult<()> {
        let name_key = key(&symbol.name);
        if let Some(first) = self.globals.get(&name_key) {
            return Err(SymbolError::duplicate_symbol(
                &symbol.name,
                first.decl_line,
                symbol.span(),
            ));
        }
        if self.globals.len() >= MAX_GLOBAL_SYMBOLS {
            return Err(SymbolError::capacity_exceeded(
                "global",
                MAX_GLOBAL_SYMBOLS,
                symbol.span(),
            ));
        }
        self.globals.insert(name_key, symbol);
        Ok(())
    }

    pub fn lookup_global(&self, name: &str) -> Option<&Symbol> {
        self.globals.get(&key(name))
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains_key(&key(name))
    }

    /// Globals ordered by declaration position
    pub fn globals(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<&Symbol> = self.globals.values().collect();
        symbols.sort_by_key(|s| (s.decl_line, s.decl_column));
        symbols
    }

    pub fn global_count(&self) -> usize {
        self.globals.len()
    }

    // Method scopes

    pub fn declare_local(&mut self, method: &str, symbol: Symbol) -> SymbolResult<()> {
        let scope = self.locals.entry(key(method)).or_default();
        Self::declare_scoped(scope, symbol)
    }

    /// Inline assembly label inside `method`; without a method the label is global
    pub fn declare_pasm_label(&mut self, method: Option<&str>, symbol: Symbol) -> SymbolResult<()> {
        match method {
            Some(method) => {
                let scope = self.pasm_labels.entry(key(method)).or_default();
                Self::declare_scoped(scope, symbol)
            }
            None => self.declare_global(symbol),
        }
    }

    fn declare_scoped(scope: &mut HashMap<String, Symbol>, symbol: Symbol) -> SymbolResult<()> {
        let name_key = key(&symbol.name);
        if let Some(first) = scope.get(&name_key) {
            return Err(SymbolError::duplicate_symbol(
                &symbol.name,
                first.decl_line,
                symbol.span(),
            ));
        }
        if scope.len() >= MAX_LOCALS_PER_METHOD {
            return Err(SymbolError::capacity_exceeded(
                "local",
                MAX_LOCALS_PER_METHOD,
                symbol.span(),
            ));
        }
        scope.insert(name_key, symbol);
        Ok(())
    }

    pub fn lookup_local(&self, method: &str, name: &str) -> Option<&Symbol> {
        self.locals.get(&key(method))?.get(&key(name))
    }

    pub fn lookup_pasm_label(&self, method: &str, name: &str) -> Option<&Symbol> {
        self.pasm_labels.get(&key(method))?.get(&key(name))
    }

    /// Resolve a bare name: method local, then inline label, then global
    pub fn lookup(&self, method: Option<&str>, name: &str) -> Option<&Symbol> {
        if let Some(method) = method {
            if let Some(symbol) = self
                .lookup_local(method, name)
                .or_else(|| self.lookup_pasm_label(method, name))
            {
                return Some(symbol);
            }
        }
        self.lookup_global(name)
    }

    // Methods

    pub fn declare_method(&mut self, signature: MethodSignature) -> SymbolResult<()> {
        let name_key = key(&signature.name);
        if let Some(first) = self.methods.get(&name_key) {
            return Err(SymbolError::duplicate_method(
                &signature.name,
                first.is_public,
                Span::single_line(
                    signature.line,
                    signature.column,
                    signature.column + signature.name.len(),
                ),
            ));
        }
        self.methods.insert(name_key, signature);
        Ok(())
    }

    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.get(&key(name))
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    // Structures

    pub fn declare_structure(&mut self, structure: StructureDef) -> SymbolResult<()> {
        let name_key = key(&structure.name);
        let span = Span::single_line(
            structure.line,
            structure.column,
            structure.column + structure.name.len(),
        );
        if let Some(first_line) = self.structure_line(&name_key) {
            return Err(SymbolError::duplicate_structure(&structure.name, first_line, span));
        }
        self.structures.insert(name_key, structure);
        Ok(())
    }

    /// `STRUCT alias = target`
    pub fn declare_structure_alias(
        &mut self,
        alias: &str,
        target: &str,
        line: usize,
        column: usize,
    ) -> SymbolResult<()> {
        let alias_key = key(alias);
        if let Some(first_line) = self.structure_line(&alias_key) {
            return Err(SymbolError::duplicate_structure(
                alias,
                first_line,
                Span::single_line(line, column, column + alias.len()),
            ));
        }
        self.aliases.insert(
            alias_key,
            StructureAlias {
                name: alias.to_string(),
                target: target.to_string(),
                line,
            },
        );
        Ok(())
    }

    fn structure_line(&self, name_key: &str) -> Option<usize> {
        self.structures
            .get(name_key)
            .map(|s| s.line)
            .or_else(|| self.aliases.get(name_key).map(|a| a.line))
    }

    /// Structure definition, following alias chains
    pub fn structure(&self, name: &str) -> Option<&StructureDef> {
        let mut current = key(name);
        for _ in 0..=self.aliases.len() {
            if let Some(structure) = self.structures.get(&current) {
                return Some(structure);
            }
            current = key(&self.aliases.get(&current)?.target);
        }
        None
    }

    pub fn is_structure(&self, name: &str) -> bool {
        let name_key = key(name);
        self.structures.contains_key(&name_key) || self.aliases.contains_key(&name_key)
    }

    pub fn structures(&self) -> Vec<&StructureDef> {
        let mut structures: Vec<&StructureDef> = self.structures.values().collect();
        structures.sort_by_key(|s| (s.line, s.column));
        structures
    }

    pub fn record_instance(&mut self, structure: &str, variable: &str, pointer: bool) {
        self.instances.insert(
            key(variable),
            InstanceBinding {
                structure: structure.to_string(),
                pointer,
            },
        );
    }

    pub fn record_local_instance(
        &mut self,
        method: &str,
        structure: &str,
        variable: &str,
        pointer: bool,
    ) {
        self.local_instances.entry(key(method)).or_default().insert(
            key(variable),
            InstanceBinding {
                structure: structure.to_string(),
                pointer,
            },
        );
    }

    /// Structure type of a variable, method locals first
    pub fn resolve_instance_type(&self, method: Option<&str>, variable: &str) -> Option<&str> {
        let variable_key = key(variable);
        method
            .and_then(|m| self.local_instances.get(&key(m)))
            .and_then(|scope| scope.get(&variable_key))
            .or_else(|| self.instances.get(&variable_key))
            .map(|binding| binding.structure.as_str())
    }

    pub fn is_pointer_instance(&self, method: Option<&str>, variable: &str) -> bool {
        let variable_key = key(variable);
        method
            .and_then(|m| self.local_instances.get(&key(m)))
            .and_then(|scope| scope.get(&variable_key))
            .or_else(|| self.instances.get(&variable_key))
            .is_some_and(|binding| binding.pointer)
    }

    // Namespaces

    pub fn record_namespace(&mut self, import: ObjectImport) {
        let instance_key = key(&import.instance);
        if !self.namespaces.contains_key(&instance_key) {
            self.namespace_order.push(instance_key.clone());
            self.namespaces.insert(instance_key, import);
        }
    }

    pub fn namespace(&self, instance: &str) -> Option<&ObjectImport> {
        self.namespaces.get(&key(instance))
    }

    /// Imports in declaration order
    pub fn namespaces(&self) -> impl Iterator<Item = &ObjectImport> {
        self.namespace_order
            .iter()
            .filter_map(|instance| self.namespaces.get(instance))
    }

    // Export

    pub fn public_table(&self) -> PublicSymbolTable {
        let mut table = PublicSymbolTable::new();
        for symbol in self.globals.values().filter(|s| s.is_public()) {
            if symbol.kind != SymbolKind::Method {
                table.add_constant(symbol.clone());
            }
        }
        for signature in self.methods.values().filter(|m| m.is_public) {
            table.add_method(signature.clone());
        }
        for structure in self.structures.values() {
            table.add_structure(structure.clone());
        }
        for alias in self.aliases.values() {
            if let Some(structure) = self.structure(&alias.target) {
                let mut aliased = structure.clone();
                aliased.name = alias.name.clone();
                aliased.line = alias.line;
                table.add_structure(aliased);
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::structures::{MemberType, StructureMember};
    use crate::tokens::TokenModifier;
    use assert_matches::assert_matches;

    fn constant(name: &str, line: usize) -> Symbol {
        Symbol::new(name, SymbolKind::Constant, line, 2)
    }

    fn point() -> StructureDef {
        let mut point = StructureDef::new("point", 0, 7);
        for (name, column) in [("x", 13), ("y", 16)] {
            point
                .add_member(StructureMember {
                    name: name.to_string(),
                    member_type: MemberType::Long,
                    array_size: None,
                    line: 0,
                    column,
                })
                .unwrap();
        }
        point
    }

    #[test]
    fn test_duplicate_global_keeps_first() {
        let mut table = SymbolTable::new();
        table.declare_global(constant("X", 0)).unwrap();
        let result = table.declare_global(constant("x", 1));
        assert_matches!(result, Err(SymbolError::DuplicateSymbol { first_line: 0, .. }));
        assert_eq!(table.lookup_global("X").unwrap().decl_line, 0);
        assert_eq!(table.global_count(), 1);
    }

    #[test]
    fn test_lookup_order_local_label_global() {
        let mut table = SymbolTable::new();
        table.declare_global(constant("a", 0)).unwrap();
        table.declare_global(constant("b", 0)).unwrap();
        table
            .declare_local("main", Symbol::new("a", SymbolKind::Variable, 5, 10))
            .unwrap();
        table
            .declare_pasm_label(
                Some("main"),
                Symbol::new("b", SymbolKind::Label, 7, 0)
                    .with_modifiers(&[TokenModifier::PasmInline]),
            )
            .unwrap();

        assert_eq!(table.lookup(Some("main"), "a").unwrap().kind, SymbolKind::Variable);
        assert_eq!(table.lookup(Some("MAIN"), "B").unwrap().kind, SymbolKind::Label);
        assert_eq!(table.lookup(Some("other"), "a").unwrap().kind, SymbolKind::Constant);
        assert_eq!(table.lookup(None, "b").unwrap().kind, SymbolKind::Constant);
    }

    #[test]
    fn test_duplicate_method_names_first_scope() {
        let mut table = SymbolTable::new();
        table
            .declare_method(MethodSignature::new("start", true, 3, 4))
            .unwrap();
        let error = table
            .declare_method(MethodSignature::new("start", false, 9, 4))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Duplicate method Declaration: found earlier [PUB start()]"
        );
        assert!(table.method("START").unwrap().is_public);
    }

    #[test]
    fn test_structure_alias_and_instances() {
        let mut table = SymbolTable::new();
        table.declare_structure(point()).unwrap();
        table.declare_structure_alias("pt", "point", 1, 7).unwrap();
        assert_eq!(table.structure("PT").unwrap().members.len(), 2);

        table.record_instance("point", "p", false);
        table.record_local_instance("draw", "pt", "q", true);
        assert_eq!(table.resolve_instance_type(None, "P"), Some("point"));
        assert_eq!(table.resolve_instance_type(Some("draw"), "q"), Some("pt"));
        assert_eq!(table.resolve_instance_type(None, "q"), None);
        assert!(table.is_pointer_instance(Some("draw"), "q"));

        let error = table.declare_structure(StructureDef::new("Point", 4, 7)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Duplicate structure [Point] found earlier at line 1"
        );
    }

    #[test]
    fn test_public_table_exports() {
        let mut table = SymbolTable::new();
        table.declare_global(constant("SPEED", 1)).unwrap();
        table
            .declare_global(Symbol::new("count", SymbolKind::Variable, 4, 7))
            .unwrap();
        table
            .declare_global(
                Symbol::new("RED", SymbolKind::EnumMember, 2, 3)
                    .with_modifiers(&[TokenModifier::Readonly]),
            )
            .unwrap();
        table
            .declare_method(MethodSignature::new("start", true, 6, 4))
            .unwrap();
        table
            .declare_method(MethodSignature::new("helper", false, 9, 4))
            .unwrap();
        table.declare_structure(point()).unwrap();

        let public = table.public_table();
        assert!(public.constant("speed").is_some());
        assert!(public.constant("RED").is_some());
        assert!(public.constant("count").is_none());
        assert!(public.method("start").is_some());
        assert!(public.method("helper").is_none());
        assert!(public.structure("POINT").is_some());
        assert_eq!(public.len(), 4);
    }

    #[test]
    fn test_namespaces_keep_declaration_order() {
        let mut table = SymbolTable::new();
        for (instance, line) in [("serial", 1), ("display", 2), ("SERIAL", 3)] {
            table.record_namespace(ObjectImport {
                instance: instance.to_string(),
                filename: format!("{}.spin2", instance),
                line,
                column: 2,
                array_count: None,
                overrides: Vec::new(),
            });
        }
        let order: Vec<&str> = table.namespaces().map(|n| n.instance.as_str()).collect();
        assert_eq!(order, vec!["serial", "display"]);
        assert_eq!(table.namespace("Serial").unwrap().line, 1);
    }
}

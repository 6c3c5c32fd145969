//! PUB/PRI signatures: the method itself plus its parameters, return
//! values and locals

use super::statements::{parse_method_header, TypedName};
use super::DeclarationScanner;
use crate::builtins::is_valid_symbol_name;
use crate::lexical::LogicalLine;
use crate::logging::codes;
use crate::symbols::{Attachment, MethodSignature, SymbolKind};
use crate::tokens::TokenModifier;

impl DeclarationScanner<'_, '_> {
    pub(super) fn scan_method_header(&mut self, line: &LogicalLine, is_public: bool, start: usize) {
        let Some(header) = parse_method_header(line.code(), start) else {
            return;
        };
        let name = header.name;
        let position = line.text.position_of(name.offset);
        self.findings.begin_method(name.text, is_public, line.first_line());
        self.current_method = Some(name.text.to_string());

        if !header.has_parens {
            self.error_at(
                &line.text,
                name,
                codes::dialect::P1_SYNTAX,
                format!("P1 style method signature not allowed in P2 [{}]", name.text),
            );
        }

        let mut signature = MethodSignature::new(name.text, is_public, position.line, position.column);
        signature.comment = line.doc_comment.clone();
        signature.parameters = names_of(&header.parameters);
        signature.returns = names_of(&header.returns);
        signature.locals = names_of(&header.locals);

        match self.symbols.declare_method(signature) {
            Ok(()) => {
                self.duplicate_method = false;
                let modifiers: &[TokenModifier] = if is_public { &[] } else { &[TokenModifier::Static] };
                let symbol = self
                    .symbol_at(line, name, SymbolKind::Method)
                    .with_modifiers(modifiers);
                self.declare_global(symbol);
            }
            Err(error) => {
                self.duplicate_method = true;
                self.report(error);
            }
        }

        for parameter in &header.parameters {
            if let Some(default) = parameter.default {
                self.error_at(
                    &line.text,
                    default,
                    codes::declarations::PARAMETER_DEFAULT,
                    format!("Parameter default value [{}] not allowed", parameter.name.text),
                );
            }
            self.declare_method_local(
                line,
                parameter,
                SymbolKind::Parameter,
                &[TokenModifier::Readonly, TokenModifier::Local],
            );
        }
        for value in &header.returns {
            self.declare_method_local(line, value, SymbolKind::ReturnValue, &[TokenModifier::Local]);
        }
        for local in &header.locals {
            self.declare_method_local(line, local, SymbolKind::Variable, &[TokenModifier::Local]);
        }
    }

    fn declare_method_local(
        &mut self,
        line: &LogicalLine,
        entry: &TypedName<'_>,
        kind: SymbolKind,
        modifiers: &[TokenModifier],
    ) {
        let Some(method) = self.current_method.clone() else {
            return;
        };
        if !is_valid_symbol_name(entry.name.text) {
            return;
        }
        let mut symbol = self
            .symbol_at(line, entry.name, kind)
            .with_comment(None)
            .with_modifiers(modifiers);
        if let Some(structure) = self.structure_type_of(entry) {
            self.symbols
                .record_local_instance(&method, &structure, entry.name.text, entry.pointer);
            symbol = symbol.with_attachment(Attachment::StructureType {
                name: structure,
                pointer: entry.pointer,
            });
        }
        if let Err(error) = self.symbols.declare_local(&method, symbol) {
            // A repeated method merges into the first one's scope; its
            // locals are expected to collide
            if !self.duplicate_method {
                self.report(error);
            }
        }
    }
}

fn names_of(entries: &[TypedName<'_>]) -> Vec<String> {
    entries.iter().map(|e| e.name.text.to_string()).collect()
}

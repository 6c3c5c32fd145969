//! OBJ: child object instances

use super::statements::{parse_obj_line, Piece};
use super::DeclarationScanner;
use crate::builtins::is_valid_symbol_name;
use crate::lexical::LogicalLine;
use crate::logging::codes;
use crate::symbols::{Attachment, ObjectImport, SymbolKind};

/// Filename with the `.spin2` suffix the compiler assumes
pub(crate) fn object_filename(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".spin2") {
        name.to_string()
    } else {
        format!("{name}.spin2")
    }
}

impl DeclarationScanner<'_, '_> {
    pub(super) fn scan_obj(&mut self, line: &LogicalLine, start: usize) {
        let code = line.code();
        if code[start.min(code.len())..].trim().is_empty() {
            return;
        }
        let declaration = match parse_obj_line(code, start) {
            Ok(declaration) => declaration,
            Err(statement) => {
                self.error_at(
                    &line.text,
                    statement,
                    codes::declarations::MALFORMED_DECLARATION,
                    format!(
                        "Illegal P2 Syntax: Unable to parse object declaration [{}]",
                        statement.text
                    ),
                );
                return;
            }
        };
        if !is_valid_symbol_name(declaration.instance.text) {
            return;
        }

        let filename = object_filename(declaration.filename.text);
        self.check_object_file(line, declaration.filename, &filename);

        let position = line.text.position_of(declaration.instance.offset);
        self.symbols.record_namespace(ObjectImport {
            instance: declaration.instance.text.to_string(),
            filename: filename.clone(),
            line: position.line,
            column: position.column,
            array_count: declaration.count.map(|c| c.text.to_string()),
            overrides: declaration
                .overrides
                .iter()
                .map(|(name, _)| name.text.to_string())
                .collect(),
        });
        let symbol = self
            .symbol_at(line, declaration.instance, SymbolKind::Namespace)
            .with_attachment(Attachment::Filename(filename));
        self.declare_global(symbol);
    }

    fn check_object_file(&mut self, line: &LogicalLine, piece: Piece<'_>, filename: &str) {
        if piece.text.contains('/') {
            self.error_at(
                &line.text,
                piece,
                codes::declarations::INVALID_FILENAME,
                format!("Invalid filename character \"/\" in [{}]", piece.text),
            );
            return;
        }
        let context = self.context;
        if !context
            .collaborators
            .file_system
            .file_exists(context.directory, filename)
        {
            self.error_at(
                &line.text,
                piece,
                codes::declarations::MISSING_OBJECT_FILE,
                format!("Missing object file [{filename}]"),
            );
        }
    }
}

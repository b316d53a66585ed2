//! Import/export extraction from a parse tree.

use tree_sitter::{Node, Tree};
use tycheck_diagnostics::DiagnosticCode;

use crate::analysis::{ByteRange, CachedDiagnostic, ExportSummary, ImportKind, ImportRecord, NamedBinding};
use crate::syntax::{first_named_child, text};

/// The module-level facts of one file.
#[derive(Debug, Default)]
pub struct ModuleInfo {
    /// Module specifiers in source order.
    pub imports: Vec<ImportRecord>,
    /// Exported names.
    pub exports: ExportSummary,
    /// Ambient `declare module "x"` names.
    pub declared_modules: Vec<String>,
    /// Diagnostics about the module structure itself.
    pub diagnostics: Vec<CachedDiagnostic>,
}

/// Extracts imports, exports, and ambient module declarations.
pub fn extract(tree: &Tree, src: &str) -> ModuleInfo {
    let root = tree.root_node();
    let mut info = ModuleInfo::default();
    let mut default_exports = Vec::new();

    let mut cursor = root.walk();
    for stmt in root.named_children(&mut cursor) {
        match stmt.kind() {
            "import_statement" => import_statement(stmt, src, &mut info),
            "export_statement" => {
                export_statement(stmt, src, &mut info, &mut default_exports);
            }
            "ambient_declaration" => ambient_modules(stmt, src, &mut info.declared_modules),
            _ => {}
        }
    }
    dynamic_imports(root, src, &mut info.imports);

    if default_exports.len() > 1 {
        for range in default_exports {
            info.diagnostics.push(CachedDiagnostic::error(
                DiagnosticCode::MULTIPLE_DEFAULT_EXPORTS,
                "A module cannot have multiple default exports.",
                range,
            ));
        }
    }
    info
}

/// The value of a string literal node, without its quotes.
fn string_value<'a>(node: Node<'_>, src: &'a str) -> &'a str {
    let raw = text(node, src);
    if node.kind() == "string" && raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| !c.is_named() && c.kind() == token);
    found
}

fn named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn import_statement(stmt: Node<'_>, src: &str, info: &mut ModuleInfo) {
    if let Some(require) = named_child_of_kind(stmt, "import_require_clause") {
        if let Some(source) = require
            .child_by_field_name("source")
            .or_else(|| named_child_of_kind(require, "string"))
        {
            info.imports.push(ImportRecord::bare(
                string_value(source, src),
                ByteRange::of_node(source),
                ImportKind::RequireAlias,
            ));
        }
        return;
    }
    let Some(source) = stmt.child_by_field_name("source") else {
        return;
    };
    let mut record = ImportRecord::bare(
        string_value(source, src),
        ByteRange::of_node(source),
        ImportKind::Static,
    );
    if let Some(clause) = named_child_of_kind(stmt, "import_clause") {
        let mut cursor = clause.walk();
        for part in clause.named_children(&mut cursor) {
            match part.kind() {
                "identifier" => record.default_binding = Some(ByteRange::of_node(part)),
                "named_imports" => {
                    let mut inner = part.walk();
                    for spec in part.named_children(&mut inner) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        let Some(name) = spec.child_by_field_name("name") else {
                            continue;
                        };
                        let imported = string_value(name, src);
                        if imported == "default" {
                            record.default_binding = Some(ByteRange::of_node(name));
                        } else {
                            record.named.push(NamedBinding {
                                name: imported.to_string(),
                                range: ByteRange::of_node(name),
                            });
                        }
                    }
                }
                _ => {}
            }
        }
    }
    info.imports.push(record);
}

fn export_statement(
    stmt: Node<'_>,
    src: &str,
    info: &mut ModuleInfo,
    default_exports: &mut Vec<ByteRange>,
) {
    if has_token(stmt, "=") {
        info.exports.export_assignment = true;
        return;
    }
    if let Some(source) = stmt.child_by_field_name("source") {
        reexport(stmt, source, src, info);
        return;
    }
    if has_token(stmt, "default") {
        info.exports.has_default = true;
        let mut cursor = stmt.walk();
        let keyword = stmt
            .children(&mut cursor)
            .find(|c| c.kind() == "default")
            .map(ByteRange::of_node);
        default_exports.push(keyword.unwrap_or_else(|| ByteRange::of_node(stmt)));
        return;
    }
    if let Some(decl) = stmt.child_by_field_name("declaration") {
        declaration_names(decl, src, &mut info.exports.names);
        return;
    }
    if let Some(clause) = named_child_of_kind(stmt, "export_clause") {
        let mut cursor = clause.walk();
        for spec in clause.named_children(&mut cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            let exported = spec.child_by_field_name("alias").unwrap_or(name);
            let exported = string_value(exported, src);
            if exported == "default" {
                info.exports.has_default = true;
                default_exports.push(ByteRange::of_node(spec));
            } else {
                info.exports.names.push(exported.to_string());
            }
        }
    }
}

fn reexport(stmt: Node<'_>, source: Node<'_>, src: &str, info: &mut ModuleInfo) {
    let mut record = ImportRecord::bare(
        string_value(source, src),
        ByteRange::of_node(source),
        ImportKind::ReExport,
    );
    if let Some(ns) = named_child_of_kind(stmt, "namespace_export") {
        if let Some(name) = first_named_child(ns) {
            info.exports.names.push(string_value(name, src).to_string());
        }
    } else if let Some(clause) = named_child_of_kind(stmt, "export_clause") {
        let mut cursor = clause.walk();
        for spec in clause.named_children(&mut cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            let imported = string_value(name, src);
            let exported = spec
                .child_by_field_name("alias")
                .map(|alias| string_value(alias, src))
                .unwrap_or(imported);
            if imported == "default" {
                record.default_binding = Some(ByteRange::of_node(name));
            } else {
                record.named.push(NamedBinding {
                    name: imported.to_string(),
                    range: ByteRange::of_node(name),
                });
            }
            if exported == "default" {
                info.exports.has_default = true;
            } else {
                info.exports.names.push(exported.to_string());
            }
        }
    } else if has_token(stmt, "*") {
        record.star = true;
    }
    info.imports.push(record);
}

/// Pushes the names a declaration binds.
fn declaration_names(decl: Node<'_>, src: &str, names: &mut Vec<String>) {
    match decl.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = decl.walk();
            for declarator in decl.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = declarator.child_by_field_name("name") {
                    pattern_names(name, src, names);
                }
            }
        }
        "ambient_declaration" => {
            if let Some(inner) = first_named_child(decl) {
                declaration_names(inner, src, names);
            }
        }
        _ => {
            if let Some(name) = decl.child_by_field_name("name") {
                names.push(text(name, src).to_string());
            }
        }
    }
}

/// Identifiers bound by a destructuring pattern (or a plain identifier).
fn pattern_names(pattern: Node<'_>, src: &str, names: &mut Vec<String>) {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            names.push(text(pattern, src).to_string());
        }
        "pair_pattern" => {
            if let Some(value) = pattern.child_by_field_name("value") {
                pattern_names(value, src, names);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = pattern.child_by_field_name("left") {
                pattern_names(left, src, names);
            }
        }
        _ => {
            let mut cursor = pattern.walk();
            for child in pattern.named_children(&mut cursor) {
                pattern_names(child, src, names);
            }
        }
    }
}

fn ambient_modules(stmt: Node<'_>, src: &str, declared: &mut Vec<String>) {
    let mut cursor = stmt.walk();
    for child in stmt.named_children(&mut cursor) {
        if child.kind() != "module" {
            continue;
        }
        if let Some(name) = child.child_by_field_name("name") {
            if name.kind() == "string" {
                declared.push(string_value(name, src).to_string());
            }
        }
    }
}

/// Collects `import("x")` calls anywhere in the file.
fn dynamic_imports(root: Node<'_>, src: &str, imports: &mut Vec<ImportRecord>) {
    let mut cursor = root.walk();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() {
            continue;
        }
        if node.kind() == "call_expression" {
            let is_import = node
                .child_by_field_name("function")
                .is_some_and(|f| f.kind() == "import");
            let arg = node
                .child_by_field_name("arguments")
                .and_then(first_named_child)
                .filter(|a| a.kind() == "string");
            if let (true, Some(arg)) = (is_import, arg) {
                imports.push(ImportRecord::bare(
                    string_value(arg, src),
                    ByteRange::of_node(arg),
                    ImportKind::Dynamic,
                ));
            }
        }
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;

    fn extract_from(lang: Lang, src: &str) -> ModuleInfo {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&lang.tree_sitter_language()).unwrap();
        let tree = parser.parse(src, None).unwrap();
        extract(&tree, src)
    }

    #[test]
    fn import_forms() {
        let src = "import React, { useState, type FC } from 'react';\n\
                   import * as path from 'node:path';\n\
                   import './index.css';\n\
                   import { default as A } from './A';\n";
        let info = extract_from(Lang::Tsx, src);
        assert_eq!(info.imports.len(), 4);

        let react = &info.imports[0];
        assert_eq!(react.specifier, "react");
        assert!(react.default_binding.is_some());
        let names: Vec<_> = react.named.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["useState", "FC"]);
        assert_eq!(&src[react.range.start as usize..react.range.end as usize], "'react'");

        assert!(info.imports[1].named.is_empty());
        assert!(info.imports[1].default_binding.is_none());
        assert_eq!(info.imports[2].specifier, "./index.css");
        assert!(info.imports[3].default_binding.is_some());
    }

    #[test]
    fn export_forms() {
        let src = "export const a = 1, { b, c: d } = obj;\n\
                   export function f() {}\n\
                   export class K {}\n\
                   export interface I {}\n\
                   export type T = string;\n\
                   export enum E { X }\n\
                   const local = 2;\n\
                   export { local as renamed };\n\
                   export default f;\n";
        let info = extract_from(Lang::TypeScript, src);
        let mut names = info.exports.names.clone();
        names.sort();
        assert_eq!(names, vec!["E", "I", "K", "T", "a", "b", "d", "f", "renamed"]);
        assert!(info.exports.has_default);
        assert!(info.diagnostics.is_empty());
    }

    #[test]
    fn reexports_are_imports() {
        let src = "export * from './all';\n\
                   export * as ns from './ns';\n\
                   export { x, default as Y, z as default } from './mixed';\n";
        let info = extract_from(Lang::TypeScript, src);
        assert_eq!(info.imports.len(), 3);
        assert!(info.imports.iter().all(|i| i.kind == ImportKind::ReExport));
        assert!(info.imports[0].star);
        assert!(!info.imports[1].star);
        let mixed = &info.imports[2];
        assert!(mixed.default_binding.is_some());
        let names: Vec<_> = mixed.named.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["x", "z"]);
        let mut exported = info.exports.names.clone();
        exported.sort();
        assert_eq!(exported, vec!["Y", "ns", "x"]);
        assert!(info.exports.has_default);
    }

    #[test]
    fn multiple_default_exports() {
        let src = "export default function A() {}\nexport default 1;\n";
        let info = extract_from(Lang::TypeScript, src);
        assert_eq!(info.diagnostics.len(), 2);
        assert!(info
            .diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::MULTIPLE_DEFAULT_EXPORTS));
    }

    #[test]
    fn dynamic_import_and_ambient_modules() {
        let src = "declare module '*.svg' { const src: string; export default src; }\n\
                   const Lazy = () => import('./Lazy');\n";
        let info = extract_from(Lang::TypeScript, src);
        assert_eq!(info.declared_modules, vec!["*.svg"]);
        assert_eq!(info.imports.len(), 1);
        assert_eq!(info.imports[0].kind, ImportKind::Dynamic);
        assert_eq!(info.imports[0].specifier, "./Lazy");
    }

    #[test]
    fn export_assignment_is_opaque() {
        let info = extract_from(Lang::TypeScript, "const x = 1;\nexport = x;\n");
        assert!(info.exports.export_assignment);
    }
}

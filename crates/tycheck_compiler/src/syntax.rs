//! Syntax diagnostics derived from a tree-sitter parse tree.

use std::collections::HashSet;

use tree_sitter::{Node, Tree};
use tycheck_diagnostics::DiagnosticCode;

use crate::analysis::{ByteRange, CachedDiagnostic};

/// Collects syntax errors and the per-node checks that need no other file.
///
/// - `MISSING` tokens become "'x' expected." (or "Identifier expected."),
///   reported at the token that follows the gap.
/// - `ERROR` nodes are reported once. A JSX closing tag left without its `>`
///   is reported as "'>' expected." at the token after the tag name; any
///   other region is reported at its first token. Nothing inside an `ERROR`
///   node is inspected further.
/// - JSX elements whose closing tag does not match the opening tag.
/// - `require("x")` calls get a conversion suggestion.
pub fn collect(tree: &Tree, src: &str) -> Vec<CachedDiagnostic> {
    let root = tree.root_node();
    let mut diags = Vec::new();
    let mut reported = HashSet::new();
    let mut cursor = root.walk();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.is_error() {
            let diag = unexpected_tokens(root, node, src);
            if reported.insert(diag.range.start) {
                diags.push(diag);
            }
            continue;
        }
        if node.is_missing() {
            let diag = missing_token(root, node, src);
            if reported.insert(diag.range.start) {
                diags.push(diag);
            }
            continue;
        }
        match node.kind() {
            "jsx_element" => check_jsx_element(node, src, &mut diags),
            "call_expression" => check_require(node, src, &mut diags),
            _ => {}
        }
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    diags
}

/// Returns the source text of a node.
pub(crate) fn text<'a>(node: Node<'_>, src: &'a str) -> &'a str {
    src.get(node.byte_range()).unwrap_or("")
}

fn first_leaf(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    loop {
        let mut cursor = current.walk();
        let first = current.children(&mut cursor).next();
        match first {
            Some(child) => current = child,
            None => return current,
        }
    }
}

/// The token starting at the first non-whitespace byte at or after `from`.
///
/// Falls back to a single character when no leaf starts there, and to an
/// empty range at end of input.
fn next_token(root: Node<'_>, src: &str, from: usize) -> ByteRange {
    let rest = src.get(from..).unwrap_or("");
    let Some((offset, ch)) = rest.char_indices().find(|(_, c)| !c.is_whitespace()) else {
        return ByteRange::new(src.len() as u32, src.len() as u32);
    };
    let pos = from + offset;
    if let Some(leaf) = root.descendant_for_byte_range(pos, pos + ch.len_utf8()) {
        if leaf.child_count() == 0 && leaf.start_byte() == pos && leaf.end_byte() > pos {
            return ByteRange::of_node(leaf);
        }
    }
    ByteRange::new(pos as u32, (pos + ch.len_utf8()) as u32)
}

fn missing_token(root: Node<'_>, node: Node<'_>, src: &str) -> CachedDiagnostic {
    let kind = node.kind();
    let range = next_token(root, src, node.start_byte());
    if kind.contains("identifier") {
        CachedDiagnostic::error(
            DiagnosticCode::IDENTIFIER_EXPECTED,
            "Identifier expected.",
            range,
        )
    } else if node.is_named() {
        CachedDiagnostic::error(
            DiagnosticCode::EXPRESSION_EXPECTED,
            "Expression expected.",
            range,
        )
    } else {
        CachedDiagnostic::error(
            DiagnosticCode::TOKEN_EXPECTED,
            format!("'{kind}' expected."),
            range,
        )
    }
}

fn unexpected_tokens(root: Node<'_>, node: Node<'_>, src: &str) -> CachedDiagnostic {
    if let Some(name_end) = unterminated_closing_tag(node, src) {
        return CachedDiagnostic::error(
            DiagnosticCode::TOKEN_EXPECTED,
            "'>' expected.",
            next_token(root, src, name_end),
        );
    }
    let leaf = first_leaf(node);
    let range = if leaf.end_byte() > leaf.start_byte() {
        ByteRange::of_node(leaf)
    } else {
        next_token(root, src, node.start_byte())
    };
    let top_level = node.parent().map_or(true, |p| p.kind() == "program");
    if top_level {
        CachedDiagnostic::error(
            DiagnosticCode::DECLARATION_EXPECTED,
            "Declaration or statement expected.",
            range,
        )
    } else {
        CachedDiagnostic::error(
            DiagnosticCode::EXPRESSION_EXPECTED,
            "Expression expected.",
            range,
        )
    }
}

/// Finds a `</name` inside an error region that is not followed by `>`.
///
/// Recovery often swallows the whole statement around such a tag, and the
/// tokens inside the region are not reliably lexed as JSX, so the tag is
/// located in the text. The region is widened to the start of the next
/// sibling. Returns the offset just past the tag name.
fn unterminated_closing_tag(node: Node<'_>, src: &str) -> Option<usize> {
    let bytes = src.as_bytes();
    let end = node
        .next_sibling()
        .map(|n| n.start_byte())
        .or_else(|| node.parent().map(|p| p.end_byte()))
        .unwrap_or(node.end_byte())
        .max(node.end_byte())
        .min(src.len());
    let mut at = node.start_byte();
    while let Some(found) = src.get(at..end).and_then(|window| window.find("</")) {
        let open = at + found;
        let name_start = skip_whitespace(bytes, open + 2);
        let mut name_end = name_start;
        while bytes.get(name_end).copied().is_some_and(is_tag_name_byte) {
            name_end += 1;
        }
        let after = skip_whitespace(bytes, name_end);
        if name_end > name_start && bytes.get(after) != Some(&b'>') {
            return Some(name_end);
        }
        at = open + 2;
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'-' | b'.' | b':')
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Returns the first named child of a node.
pub(crate) fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let first = node.named_children(&mut cursor).next();
    first
}

fn tag_name(tag: Node<'_>) -> Option<Node<'_>> {
    tag.child_by_field_name("name")
        .or_else(|| first_named_child(tag))
        .filter(|n| !n.is_missing() && n.end_byte() > n.start_byte())
}

fn check_jsx_element(node: Node<'_>, src: &str, diags: &mut Vec<CachedDiagnostic>) {
    let open = node
        .child_by_field_name("open_tag")
        .or_else(|| child_of_kind(node, "jsx_opening_element"));
    let close = node
        .child_by_field_name("close_tag")
        .or_else(|| child_of_kind(node, "jsx_closing_element"));
    let (Some(open), Some(close)) = (open, close) else {
        return;
    };
    let (Some(open_name), Some(close_name)) = (tag_name(open), tag_name(close)) else {
        return;
    };
    let expected = text(open_name, src);
    if expected == text(close_name, src) {
        return;
    }
    diags.push(
        CachedDiagnostic::error(
            DiagnosticCode::JSX_CLOSING_TAG_MISMATCH,
            format!("Expected corresponding JSX closing tag for '{expected}'."),
            ByteRange::of_node(close_name),
        )
        .with_related(
            ByteRange::of_node(open_name),
            format!(
                "The parser expected to find a '</{expected}>' to match the '<{expected}>' token here."
            ),
        ),
    );
}

fn check_require(node: Node<'_>, src: &str, diags: &mut Vec<CachedDiagnostic>) {
    let Some(function) = node.child_by_field_name("function") else {
        return;
    };
    if function.kind() != "identifier" || text(function, src) != "require" {
        return;
    }
    let has_string_arg = node
        .child_by_field_name("arguments")
        .and_then(first_named_child)
        .is_some_and(|arg| arg.kind() == "string");
    if has_string_arg {
        diags.push(CachedDiagnostic::suggestion(
            DiagnosticCode::REQUIRE_TO_IMPORT,
            "'require' call may be converted to an import.",
            ByteRange::of_node(node),
        ));
    }
}

//! Numeric diagnostic codes, displayed with the `TS` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A diagnostic code such as `TS1005`.
///
/// The numbers follow the TypeScript compiler's catalogue so that users and
/// tools that already know those codes can act on them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode(pub u32);

impl DiagnosticCode {
    /// `Identifier expected.`
    pub const IDENTIFIER_EXPECTED: DiagnosticCode = DiagnosticCode(1003);
    /// `'{0}' expected.`
    pub const TOKEN_EXPECTED: DiagnosticCode = DiagnosticCode(1005);
    /// `Expression expected.`
    pub const EXPRESSION_EXPECTED: DiagnosticCode = DiagnosticCode(1109);
    /// `Declaration or statement expected.`
    pub const DECLARATION_EXPECTED: DiagnosticCode = DiagnosticCode(1128);
    /// `Module '{0}' has no default export.`
    pub const NO_DEFAULT_EXPORT: DiagnosticCode = DiagnosticCode(1192);
    /// `Module '{0}' has no exported member '{1}'.`
    pub const NO_EXPORTED_MEMBER: DiagnosticCode = DiagnosticCode(2305);
    /// `Cannot find module '{0}' or its corresponding type declarations.`
    pub const CANNOT_FIND_MODULE: DiagnosticCode = DiagnosticCode(2307);
    /// `A module cannot have multiple default exports.`
    pub const MULTIPLE_DEFAULT_EXPORTS: DiagnosticCode = DiagnosticCode(2528);
    /// `Expected corresponding JSX closing tag for '{0}'.`
    pub const JSX_CLOSING_TAG_MISMATCH: DiagnosticCode = DiagnosticCode(17002);
    /// `'require' call may be converted to an import.`
    pub const REQUIRE_TO_IMPORT: DiagnosticCode = DiagnosticCode(80005);

    /// Returns the raw number.
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TS{}", self.0)
    }
}

//! Error codes for all rewriter diagnostics.
//!
//! The first digit names the failure class:
//! - E1xxx: structural mismatch (an expected tree shape was not found)
//! - E2xxx: policy violation (user code breaks a rewrite precondition)
//! - E3xxx: unsupported input (no rule for this tree or value)
//! - E4xxx: warnings about generated code
//! - E5xxx: backend failures
//! - E9xxx: internal errors

use std::fmt;

use crate::Severity;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Structural mismatch (E1xxx)
    /// Extension annotation with the wrong number of arguments
    E1001,

    // Policy violations (E2xxx)
    /// Staged extension without a declared result type
    E2001,
    /// Extension body redeclares a reserved name
    E2002,
    /// Deprecated extension annotation spelling
    E2003,
    /// More than one extension annotation on one definition
    E2004,

    // Unsupported input (E3xxx)
    /// Extension target type shape not handled
    E3001,
    /// Captured value kind has no tree conversion
    E3002,

    // Generated-code warnings (E4xxx)
    /// Runtime extension ties call sites to the defining scope
    E4001,
    /// Staged extension outside an object or package is not expanded
    E4002,

    // Backend (E5xxx)
    /// Toolbox rejected the generated tree
    E5001,

    // Internal (E9xxx)
    /// Internal rewriter error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Warning codes (E4xxx) never fail a unit; every other class does.
    pub fn severity(self) -> Severity {
        match self {
            ErrorCode::E4001 | ErrorCode::E4002 => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

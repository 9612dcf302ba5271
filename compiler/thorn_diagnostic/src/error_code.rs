use std::fmt;

/// Error codes for pattern diagnostics.
///
/// Format: E#### where the leading digit indicates phase; E3xxx is the
/// pattern-analysis block.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Non-exhaustive match
    E3001,
    /// Unreachable match arm
    E3002,
    /// Refutable pattern in binding position
    E3003,
    /// Irrefutable pattern in conditional binding (warning)
    E3004,
    /// Constructor arity mismatch
    E3005,
    /// Ambiguous rest marker
    E3006,
    /// Misplaced rest marker
    E3007,
    /// Or-pattern alternatives bind different names
    E3008,
    /// Reversed or empty range pattern
    E3009,
    /// Unknown constructor in pattern
    E3010,
    /// Unknown record field in pattern
    E3011,
    /// Duplicate record field in pattern
    E3012,
    /// Analysis step budget exceeded
    E3013,
}

impl ErrorCode {
    /// The code as written in diagnostics, e.g. `"E3001"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E3011 => "E3011",
            ErrorCode::E3012 => "E3012",
            ErrorCode::E3013 => "E3013",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Stable error codes
//!
//! Codes never change meaning once published; new kinds get new codes.

/// Syntax/parsing errors (E0xxx)
pub mod syntax {
    pub const UNEXPECTED_TOKEN: &str = "E0001";
}

/// Runtime errors (E4xxx)
pub mod runtime {
    pub const UNKNOWN_COMMAND: &str = "E4001";
    pub const ARITY_MISMATCH: &str = "E4002";
    pub const TYPE_MISMATCH: &str = "E4003";
    pub const DIVISION_BY_ZERO: &str = "E4004";
    pub const INDEX_OUT_OF_BOUNDS: &str = "E4005";
    pub const EMPTY_LIST: &str = "E4006";
    pub const UNDEFINED_VARIABLE: &str = "E4007";
    pub const UNDEFINED_PROCEDURE: &str = "E4008";
    pub const CONTEXT: &str = "E4009";
    pub const FOR_LOOP_STEP: &str = "E4010";
}

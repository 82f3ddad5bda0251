//! Error taxonomy
//!
//! Every error raised by the engine belongs to exactly one [`ErrorKind`], so
//! callers can decide how to recover (re-prompt, refresh prices, reject the
//! configuration) without matching every module-specific variant.

use std::fmt;

/// Broad classification of engine errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value of the wrong shape was supplied (malformed code, unknown
    /// strength token, wrong rule arity).
    InvalidArgument,

    /// A catalogue rule violates the pricing invariants.
    InvalidConfiguration,

    /// A referenced item code is not in the catalogue.
    NotFound,

    /// The operation would break a basket invariant.
    InvalidState,

    /// A caller-supplied price disagrees with the catalogue.
    PriceMismatch,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::InvalidConfiguration => "invalid configuration",
            ErrorKind::NotFound => "not found",
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::PriceMismatch => "price mismatch",
        };

        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_human_readable() {
        assert_eq!(ErrorKind::PriceMismatch.to_string(), "price mismatch");
        assert_eq!(ErrorKind::NotFound.to_string(), "not found");
    }
}

// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// error.rs:

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoxedError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),
}

// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// lib.rs:

//! NaN-boxed values: doubles, booleans, null, borrowed pointers and strings, and 32-bit
//! integers, all in a single 64-bit word.

extern crate static_assertions as sa;

pub mod boxed;
pub mod error;
mod format;
mod from;
pub mod layout;
pub mod tag;

pub use boxed::{BoxedValue, Tagged};
pub use error::BoxedError;
pub use format::Rendered;
pub use tag::Tag;

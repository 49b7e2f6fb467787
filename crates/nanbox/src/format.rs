// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// format.rs:

use crate::boxed::BoxedValue;
use crate::tag::Tag;
use std::ffi::CStr;
use std::fmt::{self, Debug, Display, Formatter};

/// Diagnostic rendering. Never dereferences: strings print as their address.
///
/// To print the characters a string box points at, use [`BoxedValue::rendered`].
impl Display for BoxedValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_double() {
            return Display::fmt(&self.as_double_unchecked(), f);
        }

        match self.tag_unchecked() {
            Tag::False if self.is_false() => f.write_str("false"),
            Tag::True if self.is_true() => f.write_str("true"),
            Tag::Null if self.is_null() => f.write_str("null"),
            Tag::Pointer => write!(f, "{:#x}", self.address()),
            Tag::String => write!(f, "string@{:#x}", self.address()),
            Tag::Uint => Display::fmt(&self.as_uint_unchecked(), f),
            Tag::Sint => Display::fmt(&self.as_sint_unchecked(), f),
            _ => write!(f, "<invalid 0x{:016X}>", self.to_bits()),
        }
    }
}

impl Debug for BoxedValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_nan() {
            return f.write_str("Nan");
        }
        if self.is_double() {
            return f.debug_tuple("Double").field(&self.as_double_unchecked()).finish();
        }

        match self.tag_unchecked() {
            Tag::False if self.is_false() => f.write_str("False"),
            Tag::True if self.is_true() => f.write_str("True"),
            Tag::Null if self.is_null() => f.write_str("Null"),
            Tag::Pointer => f
                .debug_tuple("Pointer")
                .field(&format_args!("{:#x}", self.address()))
                .finish(),
            Tag::String => f
                .debug_tuple("String")
                .field(&format_args!("{:#x}", self.address()))
                .finish(),
            Tag::Uint => f.debug_tuple("Uint").field(&self.as_uint_unchecked()).finish(),
            Tag::Sint => f.debug_tuple("Sint").field(&self.as_sint_unchecked()).finish(),
            _ => f
                .debug_tuple("Invalid")
                .field(&format_args!("0x{:016X}", self.to_bits()))
                .finish(),
        }
    }
}

/// Renders a box with string payloads printed as their contents.
///
/// Created by [`BoxedValue::rendered`].
#[derive(Clone, Copy)]
pub struct Rendered(BoxedValue);

impl BoxedValue {
    /// # Safety
    /// If `self` is a string, it must point at a live null-terminated string for as long
    /// as the returned value is formatted.
    pub unsafe fn rendered(self) -> Rendered {
        Rendered(self)
    }
}

impl Display for Rendered {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.0.as_string() {
            // SAFETY: guaranteed by the caller of `BoxedValue::rendered`.
            Ok(ptr) => f.write_str(&unsafe { CStr::from_ptr(ptr) }.to_string_lossy()),
            Err(_) => Display::fmt(&self.0, f),
        }
    }
}

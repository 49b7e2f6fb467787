// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// boxed.rs:

use crate::error::BoxedError;
use crate::layout::{
    signature, tag_bits, BITS_FALSE, BITS_NAN, BITS_NULL, BITS_TRUE, MASK_INT, MASK_PAYLOAD,
    MASK_SIGNATURE, MASK_TYPE, PAYLOAD_BITS, SIGNATURE_NAN, SIGNATURE_SHIFT, TAG_SHIFT,
};
use crate::tag::Tag;
use std::ffi::{c_char, CStr};
use tracing::trace;

/// A dynamically-typed value packed into one 64-bit word.
///
/// Doubles are stored as their own bit pattern. Everything else hides in the quiet-NaN
/// region: see [`crate::layout`]. Two boxes are equal iff their bits are equal, so two
/// differently-payloaded NaNs are not equal while two identical NaNs are.
///
/// Pointer and string payloads are borrowed. The box never owns or frees the pointee.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxedValue(u64);

sa::assert_eq_size!(BoxedValue, u64, f64);
sa::assert_eq_align!(BoxedValue, u64);
sa::assert_impl_all!(BoxedValue: Send, Sync, Copy);

/// The tagged view of a word: signature, tag and payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tagged {
    pub signature: u16,
    pub tag: Tag,
    pub payload: u64,
}

impl Tagged {
    /// Reassembles the word. Out-of-range fields are truncated to their widths.
    pub const fn to_boxed(self) -> BoxedValue {
        let signature = (self.signature as u64) << SIGNATURE_SHIFT;
        let tag = ((self.tag as u64) << TAG_SHIFT) & MASK_TYPE;
        BoxedValue(signature | tag | (self.payload & MASK_PAYLOAD))
    }
}

impl Default for BoxedValue {
    fn default() -> Self {
        Self::NULL
    }
}

impl BoxedValue {
    pub const NAN: Self = Self(BITS_NAN);
    pub const FALSE: Self = Self(BITS_FALSE);
    pub const TRUE: Self = Self(BITS_TRUE);
    pub const NULL: Self = Self(BITS_NULL);

    /// Wraps raw bits. Any word can be inspected; only dereferencing payloads is unsafe.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits for debugging or advanced usage
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    pub const fn signature(self) -> u16 {
        signature(self.0)
    }

    fn verify(self, tag: Tag) -> Result<(), BoxedError> {
        if self.0 & MASK_SIGNATURE == tag_bits(tag) {
            Ok(())
        } else {
            Err(self.mismatch(tag.name()))
        }
    }

    fn mismatch(self, expected: &'static str) -> BoxedError {
        BoxedError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    /// The tag field, or `None` for ordinary doubles.
    ///
    /// The canonical NaN reports [`Tag::Nan`] even though it also counts as a double.
    pub const fn tag(self) -> Option<Tag> {
        if self.signature() == SIGNATURE_NAN {
            Some(self.tag_unchecked())
        } else {
            None
        }
    }

    pub(crate) const fn tag_unchecked(self) -> Tag {
        Tag::from_field(((self.0 & MASK_TYPE) >> TAG_SHIFT) as u8)
    }

    pub fn tagged(self) -> Option<Tagged> {
        if self.is_double() {
            return None;
        }
        Some(Tagged {
            signature: self.signature(),
            tag: self.tag_unchecked(),
            payload: self.payload(),
        })
    }

    pub const fn payload(self) -> u64 {
        self.0 & MASK_PAYLOAD
    }

    /// Kind name used in errors and diagnostics. Words with an immediate tag and a
    /// non-zero payload satisfy no predicate and report as `invalid`.
    pub fn type_name(self) -> &'static str {
        if self.is_nan() {
            "nan"
        } else if self.is_double() {
            "double"
        } else {
            let tag = self.tag_unchecked();
            if tag.is_immediate() && self.payload() != 0 {
                "invalid"
            } else {
                tag.name()
            }
        }
    }

    // D O U B L E

    pub const fn from_double(value: f64) -> Self {
        Self(value.to_bits())
    }

    /// Like [`Self::from_double`], but every NaN becomes the canonical NaN, so the result
    /// always satisfies [`Self::is_double`].
    pub fn from_double_canonical(value: f64) -> Self {
        if value.is_nan() && value.to_bits() != BITS_NAN {
            trace!(bits = value.to_bits(), "purifying non-canonical NaN");
            Self::NAN
        } else {
            Self::from_double(value)
        }
    }

    /// Bit equality with the canonical NaN, not IEEE `is_nan`.
    pub const fn is_nan(self) -> bool {
        self.0 == BITS_NAN
    }

    pub const fn is_double(self) -> bool {
        self.signature() != SIGNATURE_NAN || self.is_nan()
    }

    pub fn as_double(self) -> Result<f64, BoxedError> {
        if self.is_double() {
            Ok(self.as_double_unchecked())
        } else {
            Err(self.mismatch("double"))
        }
    }

    pub const fn as_double_unchecked(self) -> f64 {
        f64::from_bits(self.0)
    }

    // B O O L E A N  /  N U L L

    pub const fn from_bool(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    pub const fn null() -> Self {
        Self::NULL
    }

    pub const fn is_false(self) -> bool {
        self.0 == BITS_FALSE
    }

    pub const fn is_true(self) -> bool {
        self.0 == BITS_TRUE
    }

    pub const fn is_bool(self) -> bool {
        self.is_true() || self.is_false()
    }

    pub const fn is_null(self) -> bool {
        self.0 == BITS_NULL
    }

    pub fn as_bool(self) -> Result<bool, BoxedError> {
        if self.is_bool() {
            Ok(self.is_true())
        } else {
            Err(self.mismatch("bool"))
        }
    }

    // P O I N T E R  /  S T R I N G

    fn new_address(tag: Tag, addr: usize) -> Self {
        let addr = addr as u64;
        assert!(
            addr & !MASK_PAYLOAD == 0,
            "address {:#x} does not fit in {} bits",
            addr,
            PAYLOAD_BITS
        );
        Self(tag_bits(tag) | addr)
    }

    /// Boxes the address of `ptr`. The pointee is borrowed, not owned.
    ///
    /// # Panics
    /// If the address has any bit above bit 47 set.
    pub fn from_pointer<T>(ptr: *const T) -> Self {
        Self::new_address(Tag::Pointer, ptr as usize)
    }

    /// Boxes a borrowed null-terminated string.
    ///
    /// # Panics
    /// If the string's address has any bit above bit 47 set.
    pub fn from_string(string: &CStr) -> Self {
        Self::from_string_ptr(string.as_ptr())
    }

    /// Boxes a raw null-terminated string pointer, as handed over by a host runtime.
    ///
    /// # Panics
    /// If the address has any bit above bit 47 set.
    pub fn from_string_ptr(ptr: *const c_char) -> Self {
        Self::new_address(Tag::String, ptr as usize)
    }

    pub const fn is_pointer(self) -> bool {
        self.0 & MASK_SIGNATURE == tag_bits(Tag::Pointer)
    }

    pub const fn is_string(self) -> bool {
        self.0 & MASK_SIGNATURE == tag_bits(Tag::String)
    }

    /// The payload zero-extended back to a machine address.
    pub const fn address(self) -> usize {
        self.payload() as usize
    }

    /// The boxed pointer. The box carries no type, so picking `T` is up to the caller.
    pub fn as_pointer<T>(self) -> Result<*const T, BoxedError> {
        self.verify(Tag::Pointer)?;
        Ok(self.address() as *const T)
    }

    /// # Safety
    /// The box must hold a pointer to a live, properly aligned `T` that stays valid and
    /// unaliased by writers for `'a`.
    pub unsafe fn deref<'a, T>(self) -> Result<&'a T, BoxedError> {
        Ok(&*self.as_pointer::<T>()?)
    }

    pub fn as_string(self) -> Result<*const c_char, BoxedError> {
        self.verify(Tag::String)?;
        Ok(self.address() as *const c_char)
    }

    /// # Safety
    /// The box must hold a pointer to a live null-terminated string that stays valid
    /// and unmodified for `'a`.
    pub unsafe fn as_c_str<'a>(self) -> Result<&'a CStr, BoxedError> {
        Ok(CStr::from_ptr(self.as_string()?))
    }

    // I N T E G E R S

    pub const fn from_uint(value: u32) -> Self {
        Self(tag_bits(Tag::Uint) | value as u64)
    }

    pub const fn from_sint(value: i32) -> Self {
        // two's complement in the low 32 bits, upper 16 payload bits stay zero
        Self(tag_bits(Tag::Sint) | value as u32 as u64)
    }

    pub const fn is_uint(self) -> bool {
        self.0 & MASK_SIGNATURE == tag_bits(Tag::Uint)
    }

    pub const fn is_sint(self) -> bool {
        self.0 & MASK_SIGNATURE == tag_bits(Tag::Sint)
    }

    pub fn as_uint(self) -> Result<u32, BoxedError> {
        self.verify(Tag::Uint)?;
        Ok(self.as_uint_unchecked())
    }

    pub fn as_sint(self) -> Result<i32, BoxedError> {
        self.verify(Tag::Sint)?;
        Ok(self.as_sint_unchecked())
    }

    pub const fn as_uint_unchecked(self) -> u32 {
        (self.0 & MASK_INT) as u32
    }

    pub const fn as_sint_unchecked(self) -> i32 {
        (self.0 & MASK_INT) as u32 as i32
    }
}

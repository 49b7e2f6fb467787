// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// layout.rs:

//! Bit layout of a boxed word.
//!
//! ```text
//!  63 | 62 .. 52 | 51 | 50 .. 48 | 47 .. 0
//!  s  | exponent | q  |   tag    | payload
//!  \____ signature (13) _/
//! ```
//!
//! A word whose signature is [`SIGNATURE_NAN`] is a tagged value, unless it is exactly
//! [`BITS_NAN`]. Every other word is an ordinary double.

use crate::tag::Tag;

pub const MASK_SIGN: u64 = 1 << 63;
pub const MASK_EXPONENT: u64 = 0x7FF << 52; // bits 62..52
pub const MASK_QUIET: u64 = 1 << 51;

// 3-bit tag in bits 50..48
pub const TAG_BITS: u32 = 3;
pub const TAG_SHIFT: u32 = 48;
pub const MASK_TYPE: u64 = ((1 << TAG_BITS) - 1) << TAG_SHIFT;

pub const MASK_NAN: u64 = MASK_EXPONENT | MASK_QUIET;
pub const MASK_SIGNATURE: u64 = MASK_SIGN | MASK_EXPONENT | MASK_QUIET | MASK_TYPE;

// That leaves bits 47..0 for the payload.
pub const PAYLOAD_BITS: u32 = 48;
pub const MASK_PAYLOAD: u64 = !MASK_SIGNATURE; // 0x0000_FFFF_FFFF_FFFF

/// Integer payloads live in the low half of the payload field.
pub const MASK_INT: u64 = 0xFFFF_FFFF;

pub const SIGNATURE_BITS: u32 = 13;
pub const SIGNATURE_SHIFT: u32 = 64 - SIGNATURE_BITS;

/// Signature of the reserved region: sign clear, exponent all ones, quiet bit set.
pub const SIGNATURE_NAN: u16 = (MASK_NAN >> SIGNATURE_SHIFT) as u16;

/// Full word of a tagged value with `tag` and an empty payload.
pub const fn tag_bits(tag: Tag) -> u64 {
    ((tag as u64) << TAG_SHIFT) | MASK_NAN
}

/// The top 13 bits of `bits`.
pub const fn signature(bits: u64) -> u16 {
    (bits >> SIGNATURE_SHIFT) as u16
}

pub const BITS_NAN: u64 = tag_bits(Tag::Nan);
pub const BITS_FALSE: u64 = tag_bits(Tag::False);
pub const BITS_TRUE: u64 = tag_bits(Tag::True);
pub const BITS_NULL: u64 = tag_bits(Tag::Null);

sa::const_assert_eq!(BITS_NAN, 0x7FF8_0000_0000_0000);
sa::const_assert!(BITS_NAN == f64::NAN.to_bits());
sa::const_assert_eq!(SIGNATURE_NAN, 0x0FFF);
sa::const_assert_eq!(MASK_PAYLOAD, (1 << PAYLOAD_BITS) - 1);
sa::const_assert_eq!(MASK_SIGNATURE & MASK_PAYLOAD, 0);
sa::const_assert_eq!(MASK_SIGNATURE | MASK_PAYLOAD, u64::MAX);
sa::const_assert_eq!(SIGNATURE_SHIFT, TAG_SHIFT + TAG_BITS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_partition_word() {
        let parts = [MASK_SIGN, MASK_EXPONENT, MASK_QUIET, MASK_TYPE, MASK_PAYLOAD];
        let mut seen = 0u64;
        for mask in parts {
            assert_eq!(seen & mask, 0, "overlapping mask 0x{:016X}", mask);
            seen |= mask;
        }
        assert_eq!(seen, u64::MAX);
    }

    #[test]
    fn test_immediate_constants() {
        assert_eq!(BITS_NAN, f64::NAN.to_bits());
        assert_eq!(BITS_FALSE, 0x7FF9_0000_0000_0000);
        assert_eq!(BITS_TRUE, 0x7FFA_0000_0000_0000);
        assert_eq!(BITS_NULL, 0x7FFB_0000_0000_0000);

        for bits in [BITS_NAN, BITS_FALSE, BITS_TRUE, BITS_NULL] {
            assert_eq!(signature(bits), SIGNATURE_NAN, "bits=0x{:016X}", bits);
            assert_eq!(bits & MASK_PAYLOAD, 0, "bits=0x{:016X}", bits);
        }
    }

    #[test]
    fn test_signature_of_ordinary_doubles() {
        for d in [0.0, -0.0, 1.5, -1.5, f64::INFINITY, f64::NEG_INFINITY, f64::MAX] {
            assert_ne!(signature(d.to_bits()), SIGNATURE_NAN, "{} collides", d);
        }
        // negative quiet NaN keeps its sign bit, so it sits outside the reserved region
        assert_ne!(signature((-f64::NAN).to_bits()), SIGNATURE_NAN);
    }
}

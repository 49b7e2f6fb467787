// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// tag.rs:

use std::fmt::{self, Display, Formatter};

/// Discriminant stored in bits 50..48 of a tagged word.
///
/// The first four tags are immediates: the tag alone determines the value and the
/// payload is always zero. The rest carry a 48-bit payload.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Nan = 0,
    False = 1,
    True = 2,
    Null = 3,
    Pointer = 4,
    String = 5,
    Uint = 6,
    Sint = 7,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Tag::Nan,
        Tag::False,
        Tag::True,
        Tag::Null,
        Tag::Pointer,
        Tag::String,
        Tag::Uint,
        Tag::Sint,
    ];

    /// Decodes the low three bits of `field`. Every 3-bit value is a tag.
    pub const fn from_field(field: u8) -> Self {
        match field & 0b111 {
            0 => Tag::Nan,
            1 => Tag::False,
            2 => Tag::True,
            3 => Tag::Null,
            4 => Tag::Pointer,
            5 => Tag::String,
            6 => Tag::Uint,
            _ => Tag::Sint,
        }
    }

    pub const fn is_immediate(self) -> bool {
        (self as u8) < Tag::Pointer as u8
    }

    pub const fn has_payload(self) -> bool {
        !self.is_immediate()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tag::Nan => "nan",
            Tag::False => "false",
            Tag::True => "true",
            Tag::Null => "null",
            Tag::Pointer => "pointer",
            Tag::String => "string",
            Tag::Uint => "uint",
            Tag::Sint => "sint",
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trip() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_field(tag as u8), tag);
        }
        // only the low three bits matter
        assert_eq!(Tag::from_field(0b1111_1101), Tag::String);
    }

    #[test]
    fn test_immediate_split() {
        let immediates: Vec<Tag> = Tag::ALL.into_iter().filter(|t| t.is_immediate()).collect();
        assert_eq!(immediates, [Tag::Nan, Tag::False, Tag::True, Tag::Null]);

        for tag in Tag::ALL {
            assert_ne!(tag.is_immediate(), tag.has_payload(), "{}", tag);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Tag::Uint.to_string(), "uint");
        assert_eq!(Tag::Null.name(), "null");
    }
}

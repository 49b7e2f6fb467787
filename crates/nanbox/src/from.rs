// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// from.rs:

//! Generic boxing.
//!
//! Statically typed callers use `BoxedValue::from` (or `.into()`), which only compiles for
//! supported inputs. Hosts that hold values behind `dyn Any` go through
//! [`BoxedValue::try_from_any`], which rejects anything else with
//! [`BoxedError::UnsupportedType`].
//!
//! A `&CStr` boxes as a *pointer*, never as a string. Use [`BoxedValue::from_string`] for a
//! string-tagged box.

use crate::boxed::BoxedValue;
use crate::error::BoxedError;
use std::any::{type_name, Any};
use std::ffi::CStr;
use std::ptr::NonNull;
use tracing::debug;

macro_rules! impl_from {
    ($ctor:ident as $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for BoxedValue {
                fn from(value: $ty) -> Self {
                    Self::$ctor(<$target>::from(value))
                }
            }
        )*
    };
}

impl_from!(from_double as f64: f64, f32);
impl_from!(from_uint as u32: u32, u16, u8);
impl_from!(from_sint as i32: i32, i16, i8);

impl From<bool> for BoxedValue {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<()> for BoxedValue {
    fn from(_: ()) -> Self {
        Self::NULL
    }
}

impl<T> From<*const T> for BoxedValue {
    fn from(ptr: *const T) -> Self {
        Self::from_pointer(ptr)
    }
}

impl<T> From<*mut T> for BoxedValue {
    fn from(ptr: *mut T) -> Self {
        Self::from_pointer(ptr)
    }
}

impl<T> From<NonNull<T>> for BoxedValue {
    fn from(ptr: NonNull<T>) -> Self {
        Self::from_pointer(ptr.as_ptr())
    }
}

impl From<&CStr> for BoxedValue {
    fn from(string: &CStr) -> Self {
        Self::from_pointer(string.as_ptr())
    }
}

impl<T: Into<BoxedValue>> From<Option<T>> for BoxedValue {
    fn from(value: Option<T>) -> Self {
        Self::from_optional(value)
    }
}

impl BoxedValue {
    /// Boxes the contained value, or null for `None`.
    pub fn from_optional<T: Into<BoxedValue>>(value: Option<T>) -> Self {
        value.map_or(Self::NULL, Into::into)
    }

    /// Boxes a value whose concrete type is only known at runtime.
    pub fn try_from_any<T: Any>(value: &T) -> Result<Self, BoxedError> {
        Self::from_dyn(value).ok_or_else(|| {
            debug!(ty = type_name::<T>(), "refusing to box unsupported type");
            BoxedError::UnsupportedType(type_name::<T>())
        })
    }

    fn from_dyn(value: &dyn Any) -> Option<Self> {
        // every supported type is also accepted wrapped in an `Option`
        macro_rules! dispatch {
            ($($ty:ty),*) => {
                $(
                    if let Some(value) = value.downcast_ref::<$ty>() {
                        return Some(Self::from(*value));
                    }
                    if let Some(value) = value.downcast_ref::<Option<$ty>>() {
                        return Some(Self::from(*value));
                    }
                )*
            };
        }

        macro_rules! dispatch_pointers {
            ($($ty:ty),*) => {
                $(
                    dispatch!(*const $ty, *mut $ty, NonNull<$ty>);
                )*
            };
        }

        dispatch!(f64, f32, u32, u16, u8, i32, i16, i8, bool, (), &'static CStr);
        dispatch_pointers!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, bool, ());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_dispatch() {
        assert!(BoxedValue::from(()).is_null());
        assert!(BoxedValue::from(true).is_true());
        assert!(BoxedValue::from(false).is_false());
        assert!(BoxedValue::from(42u32).is_uint());
        assert!(BoxedValue::from(-42).is_sint());
        assert!(BoxedValue::from(f64::NAN).is_nan());
        assert!(BoxedValue::from(0.05).is_double());
        assert!(!BoxedValue::from(0.05).is_nan());
        assert_eq!(BoxedValue::from(-42).as_sint(), Ok(-42));
        assert_eq!(BoxedValue::from(7u8).as_uint(), Ok(7));
        assert_eq!(BoxedValue::from(-7i16).as_sint(), Ok(-7));
        assert_eq!(BoxedValue::from(1.5f32).as_double(), Ok(1.5));
    }

    #[test]
    fn test_string_literal_boxes_as_pointer() {
        let literal = c"hello";
        let b = BoxedValue::from(literal);
        assert!(b.is_pointer());
        assert!(!b.is_string());
        assert_eq!(b.as_pointer::<u8>().unwrap(), literal.as_ptr().cast::<u8>());
    }

    #[test]
    fn test_pointer_dispatch() {
        let mut slot = 5i32;
        let b = BoxedValue::from(&mut slot as *mut i32);
        assert!(b.is_pointer());

        let b2 = BoxedValue::from(NonNull::from(&slot));
        assert_eq!(b, b2);
    }

    #[test]
    fn test_optional() {
        assert!(BoxedValue::from_optional(None::<u32>).is_null());

        let b = BoxedValue::from_optional(Some(42u32));
        assert!(b.is_uint());
        assert_eq!(b.as_uint(), Ok(42));

        assert!(BoxedValue::from(Some(Some(true))).is_true());
        assert!(BoxedValue::from(Some(None::<bool>)).is_null());
    }

    #[test]
    fn test_dynamic_dispatch() -> Result<(), BoxedError> {
        assert!(BoxedValue::try_from_any(&3.25f64)?.is_double());
        assert!(BoxedValue::try_from_any(&42u32)?.is_uint());
        assert!(BoxedValue::try_from_any(&-1i32)?.is_sint());
        assert!(BoxedValue::try_from_any(&())?.is_null());
        assert!(BoxedValue::try_from_any(&None::<f64>)?.is_null());
        assert!(BoxedValue::try_from_any(&c"text")?.is_pointer());
        Ok(())
    }

    #[test]
    fn test_dynamic_dispatch_matches_static() -> Result<(), BoxedError> {
        macro_rules! same {
            ($($value:expr),* $(,)?) => {
                $(
                    let value = $value;
                    let dynamic = BoxedValue::try_from_any(&value)?;
                    let expected = BoxedValue::from(value);
                    assert_eq!(
                        dynamic,
                        expected,
                        "{} => bits=0x{:016X}",
                        stringify!($value),
                        dynamic.to_bits()
                    );
                )*
            };
        }

        let mut slot = 9u32;
        let ptr: *const u32 = &slot;
        let ptr_mut: *mut u32 = &mut slot;

        same!(1.5f64, 1.5f32, 7u8, 7u16, 7u32, -7i8, -7i16, -7i32, true, false, (), c"x");
        same!(Some(2.5f64), Some(1.5f32), Some(7u8), Some(7u16), Some(7u32));
        same!(Some(-7i8), Some(-7i16), Some(-7i32), Some(true), Some(()), Some(c"x"));
        same!(None::<u8>, None::<f32>, None::<&'static CStr>, None::<*const u8>);
        same!(ptr, ptr_mut, Some(ptr), NonNull::from(&slot), Some(NonNull::from(&slot)));
        same!(NonNull::<u8>::dangling(), NonNull::<()>::dangling(), 0x40usize as *const i64);
        same!(0x40usize as *const (), Some(0x80usize as *mut u8), 0x80usize as *const f64);

        assert!(BoxedValue::try_from_any(&Some(7u8))?.is_uint());
        assert!(BoxedValue::try_from_any(&NonNull::<u8>::dangling())?.is_pointer());
        assert!(BoxedValue::try_from_any(&Some(c"x"))?.is_pointer());
        Ok(())
    }

    #[test]
    fn test_dynamic_dispatch_rejects_unsupported() {
        assert_eq!(
            BoxedValue::try_from_any(&42u64),
            Err(BoxedError::UnsupportedType("u64"))
        );
        assert!(matches!(
            BoxedValue::try_from_any(&String::from("no")),
            Err(BoxedError::UnsupportedType(_))
        ));
    }
}

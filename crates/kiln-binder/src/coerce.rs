//! Conversion of raw attribute text into typed field values.
//!
//! Conversions are locale-invariant: numbers always use `.` as the decimal
//! point and never accept digit grouping, so a build file behaves the same
//! on every machine.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to convert attribute text into a field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// The text is not a valid representation of the target type.
    #[error("not a valid {target}")]
    Invalid { target: &'static str },

    /// The text does not name one of the enumerants.
    #[error("valid values are: {}", .valid.join(", "))]
    InvalidEnum { valid: Vec<&'static str> },
}

/// Types that can be parsed from the raw text of an XML attribute.
pub trait FromAttribute: Sized {
    /// Human-readable name of the target type, used in error messages.
    const TYPE_NAME: &'static str;

    /// Convert attribute text into a value.
    fn from_attribute(raw: &str) -> Result<Self, CoerceError>;
}

/// Enumerations whose values are spelled out by name in build files.
///
/// Names are matched case-sensitively against [`AttributeEnum::VARIANTS`];
/// the declaration order of that table is the order valid values are listed
/// in error messages.
///
/// # Examples
///
/// ```
/// use kiln_binder::coerce::{AttributeEnum, coerce_enum};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Configuration {
///     Debug,
///     Release,
/// }
///
/// impl AttributeEnum for Configuration {
///     const VARIANTS: &'static [(&'static str, Self)] =
///         &[("Debug", Self::Debug), ("Release", Self::Release)];
/// }
///
/// assert_eq!(coerce_enum::<Configuration>("Release"), Ok(Configuration::Release));
/// assert!(coerce_enum::<Configuration>("release").is_err());
/// ```
pub trait AttributeEnum: Copy + PartialEq + 'static {
    /// Every enumerant with the name it is written as.
    const VARIANTS: &'static [(&'static str, Self)];

    /// All valid names, in declaration order.
    fn names() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|(name, _)| *name).collect()
    }

    /// The name this value is written as.
    fn name(&self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, value)| value == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }
}

/// Convert attribute text into any [`FromAttribute`] type.
pub fn coerce<V: FromAttribute>(raw: &str) -> Result<V, CoerceError> {
    V::from_attribute(raw)
}

/// Convert attribute text into an [`AttributeEnum`] value.
///
/// # Errors
///
/// Returns [`CoerceError::InvalidEnum`] listing every valid name when `raw`
/// matches none of them exactly.
pub fn coerce_enum<E: AttributeEnum>(raw: &str) -> Result<E, CoerceError> {
    E::VARIANTS
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, value)| *value)
        .ok_or_else(|| CoerceError::InvalidEnum { valid: E::names() })
}

impl FromAttribute for String {
    const TYPE_NAME: &'static str = "string";

    fn from_attribute(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_string())
    }
}

impl FromAttribute for PathBuf {
    const TYPE_NAME: &'static str = "path";

    fn from_attribute(raw: &str) -> Result<Self, CoerceError> {
        if raw.trim().is_empty() {
            return Err(CoerceError::Invalid {
                target: Self::TYPE_NAME,
            });
        }
        Ok(PathBuf::from(raw))
    }
}

impl FromAttribute for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_attribute(raw: &str) -> Result<Self, CoerceError> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(CoerceError::Invalid {
                target: Self::TYPE_NAME,
            })
        }
    }
}

impl FromAttribute for char {
    const TYPE_NAME: &'static str = "character";

    fn from_attribute(raw: &str) -> Result<Self, CoerceError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CoerceError::Invalid {
                target: Self::TYPE_NAME,
            }),
        }
    }
}

macro_rules! impl_from_attribute_for_number {
    ($name:literal => $($ty:ty),+) => {
        $(
            impl FromAttribute for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_attribute(raw: &str) -> Result<Self, CoerceError> {
                    raw.trim().parse().map_err(|_| CoerceError::Invalid {
                        target: Self::TYPE_NAME,
                    })
                }
            }
        )+
    };
}

impl_from_attribute_for_number!("integer" => i8, i16, i32, i64, isize);
impl_from_attribute_for_number!("non-negative integer" => u8, u16, u32, u64, usize);
impl_from_attribute_for_number!("number" => f32, f64);

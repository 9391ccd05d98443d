//! Validators run against attribute text before it is converted.
//!
//! A validator is a stateless check from raw (already expanded) attribute
//! text to ok or an error detail. Each attribute descriptor owns a
//! [`ValidationChain`] that applies its validators in declaration order and
//! stops at the first failure.
//!
//! Custom validators implement [`Validator`] or wrap a closure in
//! [`FnValidator`]; both are registered the same way as the built-in ones.

use std::fmt;

use regex::Regex;
use thiserror::Error;

/// The reason a validator rejected a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A check applied to raw attribute text.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Validate the attribute text.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing why `value` is not acceptable.
    fn validate(&self, value: &str) -> Result<(), ValidationError>;
}

/// Ordered list of validators attached to one attribute.
#[derive(Debug, Default)]
pub struct ValidationChain {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validator; validators run in the order they were pushed.
    pub fn push(&mut self, validator: impl Validator + 'static) {
        self.validators.push(Box::new(validator));
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator in order and return the first failure.
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.validate(value))
    }
}

/// Accepts integers within an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRangeValidator {
    min: i64,
    max: i64,
}

impl IntRangeValidator {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl Validator for IntRangeValidator {
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        let number: i64 = value
            .trim()
            .parse()
            .map_err(|_| ValidationError::new(format!("`{value}` is not a valid integer")))?;

        if number < self.min || number > self.max {
            return Err(ValidationError::new(format!(
                "{number} is out of range; the value must be between {} and {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Accepts `true` or `false`, ignoring ASCII case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanValidator;

impl Validator for BooleanValidator {
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            Ok(())
        } else {
            Err(ValidationError::new(format!(
                "`{value}` is not a boolean; use `true` or `false`"
            )))
        }
    }
}

/// Constrains free-form strings.
///
/// By default empty values are allowed and any text matches.
///
/// # Examples
///
/// ```
/// use kiln_binder::validate::{StringValidator, Validator};
///
/// let validator = StringValidator::new()
///     .allow_empty(false)
///     .with_pattern(r"^[A-Za-z_][\w.-]*$")
///     .expect("valid pattern");
///
/// assert!(validator.validate("build.debug").is_ok());
/// assert!(validator.validate("").is_err());
/// assert!(validator.validate("9lives").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StringValidator {
    allow_empty: bool,
    pattern: Option<Regex>,
}

impl StringValidator {
    pub fn new() -> Self {
        Self {
            allow_empty: true,
            pattern: None,
        }
    }

    /// Whether an empty value is acceptable.
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Require non-empty values to match a regular expression.
    ///
    /// # Errors
    ///
    /// Returns the compile error if `pattern` is not a valid expression.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for StringValidator {
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return if self.allow_empty {
                Ok(())
            } else {
                Err(ValidationError::new("an empty value is not allowed"))
            };
        }

        match &self.pattern {
            Some(pattern) if !pattern.is_match(value) => Err(ValidationError::new(format!(
                "`{value}` does not match the pattern `{}`",
                pattern.as_str()
            ))),
            _ => Ok(()),
        }
    }
}

/// Wraps a closure as a [`Validator`].
pub struct FnValidator<F> {
    name: &'static str,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&str) -> Result<(), ValidationError> + Send + Sync,
{
    /// Create a named closure validator; the name only shows in debug output.
    pub fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnValidator").field(&self.name).finish()
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&str) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &str) -> Result<(), ValidationError> {
        (self.check)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_range_validator() {
        let validator = IntRangeValidator::new(0, 4);

        assert!(validator.validate("0").is_ok());
        assert!(validator.validate("4").is_ok());
        assert!(validator.validate(" 2 ").is_ok());

        let err = validator.validate("5").unwrap_err();
        assert_eq!(
            err.message(),
            "5 is out of range; the value must be between 0 and 4"
        );
        assert!(validator.validate("-1").is_err());
        assert!(validator.validate("two").is_err());
    }

    #[test]
    fn test_boolean_validator() {
        assert!(BooleanValidator.validate("true").is_ok());
        assert!(BooleanValidator.validate("FALSE").is_ok());
        assert!(BooleanValidator.validate("1").is_err());
    }

    #[test]
    fn test_string_validator_defaults_accept_everything() {
        let validator = StringValidator::default();

        assert!(validator.validate("").is_ok());
        assert!(validator.validate("anything at all").is_ok());
    }

    #[test]
    fn test_string_validator_rejects_empty() {
        let validator = StringValidator::new().allow_empty(false);

        assert_eq!(
            validator.validate("").unwrap_err().message(),
            "an empty value is not allowed"
        );
        assert!(validator.validate("x").is_ok());
    }

    #[test]
    fn test_string_validator_pattern() {
        let validator = StringValidator::new().with_pattern(r"^\d+\.\d+$").unwrap();

        assert!(validator.validate("1.2").is_ok());
        assert!(validator.validate("1.2.3").is_err());
        // Empty values bypass the pattern unless they are disallowed
        assert!(validator.validate("").is_ok());
    }

    #[test]
    fn test_string_validator_invalid_pattern() {
        assert!(StringValidator::new().with_pattern("(unclosed").is_err());
    }

    #[test]
    fn test_fn_validator() {
        let validator = FnValidator::new("no-spaces", |value: &str| {
            if value.contains(' ') {
                Err(ValidationError::new("spaces are not allowed"))
            } else {
                Ok(())
            }
        });

        assert!(validator.validate("a_b").is_ok());
        assert!(validator.validate("a b").is_err());
        assert_eq!(format!("{validator:?}"), "FnValidator(\"no-spaces\")");
    }

    #[test]
    fn test_chain_stops_at_first_failure() {
        let mut chain = ValidationChain::new();
        chain.push(StringValidator::new().allow_empty(false));
        chain.push(IntRangeValidator::new(1, 10));

        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain.validate("").unwrap_err().message(),
            "an empty value is not allowed"
        );
        assert_eq!(
            chain.validate("11").unwrap_err().message(),
            "11 is out of range; the value must be between 1 and 10"
        );
        assert!(chain.validate("7").is_ok());
    }

    #[test]
    fn test_empty_chain_accepts_everything() {
        let chain = ValidationChain::new();

        assert!(chain.is_empty());
        assert!(chain.validate("whatever").is_ok());
    }
}

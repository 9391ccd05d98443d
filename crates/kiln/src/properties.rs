//! `${name}` property reference expansion.
//!
//! Expansion is single pass: substituted values are not scanned again, and
//! there is no escape syntax, so `$${name}` expands to `$` followed by the
//! value of `name`. Surrounding whitespace inside the braces is ignored.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use kiln_core::ExpansionError;

/// A reference with its optional closing brace, so unterminated references
/// can be reported instead of copied through.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]*)(\})?").unwrap());

/// Replace every `${name}` in `raw` with the value returned by `lookup`.
///
/// Returns `Cow::Borrowed` when `raw` contains no reference.
///
/// # Errors
///
/// Returns an [`ExpansionError`] for an undefined property, an empty
/// reference or an unterminated one.
pub fn expand<'a, F>(raw: &'a str, lookup: F) -> Result<Cow<'a, str>, ExpansionError>
where
    F: Fn(&str) -> Option<String>,
{
    if !raw.contains("${") {
        return Ok(Cow::Borrowed(raw));
    }

    let mut expanded = String::with_capacity(raw.len() + 32);
    let mut last = 0;
    for captures in REFERENCE.captures_iter(raw) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if captures.get(2).is_none() {
            return Err(ExpansionError::other(format!(
                "unterminated property reference `{}`",
                whole.as_str()
            )));
        }

        let name = captures[1].trim();
        if name.is_empty() {
            return Err(ExpansionError::other("empty property reference `${}`"));
        }
        let value = lookup(name).ok_or_else(|| ExpansionError::undefined_property(name))?;

        expanded.push_str(&raw[last..whole.start()]);
        expanded.push_str(&value);
        last = whole.end();
    }
    expanded.push_str(&raw[last..]);

    Ok(Cow::Owned(expanded))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn table() -> HashMap<&'static str, &'static str> {
        HashMap::from([("out", "bin"), ("config", "Debug"), ("empty", "")])
    }

    fn expand_with_table(raw: &str) -> Result<String, ExpansionError> {
        let table = table();
        expand(raw, |name| table.get(name).map(|v| v.to_string())).map(Cow::into_owned)
    }

    #[test]
    fn test_text_without_references_is_borrowed() {
        let result = expand("plain text", |_| None).unwrap();

        assert!(matches!(result, Cow::Borrowed("plain text")));
    }

    #[test]
    fn test_references_are_replaced() {
        assert_eq!(
            expand_with_table("${out}/${config}/app.exe").unwrap(),
            "bin/Debug/app.exe"
        );
        assert_eq!(expand_with_table("${ out }").unwrap(), "bin");
        assert_eq!(expand_with_table("[${empty}]").unwrap(), "[]");
    }

    #[test]
    fn test_no_escape_syntax() {
        assert_eq!(expand_with_table("$${out}").unwrap(), "$bin");
        assert_eq!(expand_with_table("cost: $5").unwrap(), "cost: $5");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let result = expand("${a}", |_| Some("${a}".to_string())).unwrap();

        assert_eq!(result, "${a}");
    }

    #[test]
    fn test_undefined_property() {
        let err = expand_with_table("${out}/${missing}").unwrap_err();

        assert_eq!(err.property(), Some("missing"));
        assert_eq!(err.to_string(), "property `missing` has not been set");
    }

    #[test]
    fn test_unterminated_reference() {
        let err = expand_with_table("${out").unwrap_err();

        assert_eq!(err.property(), None);
        assert_eq!(err.to_string(), "unterminated property reference `${out`");
    }

    #[test]
    fn test_empty_reference() {
        assert!(expand_with_table("${ }").is_err());
    }
}

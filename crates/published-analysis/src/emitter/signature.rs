//! Generic-type erasure for whitelist signatures.

use std::sync::LazyLock;

use published_core::constants::ERASED_TYPE_PLACEHOLDER;
use regex::Regex;

/// A parameter type that starts with an upper-case letter is an
/// unqualified type variable (resolved types are package-qualified).
static TYPE_VARIABLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([(, ])[A-Z][A-Za-z0-9]*").ok());

/// Strip every `<...>` section, nesting aware.
pub fn delete_generics(signature: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(signature.len());
    for ch in signature.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Erased form of a `(type, type)` signature: generics removed, type
/// variables replaced by `java.lang.Object`.
pub fn normalize_signature(signature: &str) -> String {
    if signature.is_empty() || signature == "()" {
        return signature.to_string();
    }
    let stripped = delete_generics(signature);
    match TYPE_VARIABLE.as_ref() {
        Some(re) => re
            .replace_all(&stripped, |caps: &regex::Captures<'_>| {
                format!("{}{}", &caps[1], ERASED_TYPE_PLACEHOLDER)
            })
            .into_owned(),
        None => stripped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signatures_untouched() {
        assert_eq!(normalize_signature(""), "");
        assert_eq!(normalize_signature("()"), "()");
    }

    #[test]
    fn generics_are_removed() {
        assert_eq!(
            normalize_signature("(java.util.Map<java.lang.String, java.util.List<java.lang.Integer>>, int)"),
            "(java.util.Map, int)"
        );
    }

    #[test]
    fn type_variables_become_object() {
        assert_eq!(
            normalize_signature("(T, java.lang.String, U[])"),
            "(java.lang.Object, java.lang.String, java.lang.Object[])"
        );
        assert_eq!(
            normalize_signature("(java.util.List<T>, E...)"),
            "(java.util.List, java.lang.Object...)"
        );
    }

    #[test]
    fn qualified_and_primitive_types_kept() {
        assert_eq!(
            normalize_signature("(int, java.lang.String[], long)"),
            "(int, java.lang.String[], long)"
        );
    }
}

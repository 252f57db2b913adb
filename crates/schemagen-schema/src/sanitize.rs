//! Identifier sanitization.
//!
//! Raw host identifiers may contain anything; schema identifiers are plain
//! ASCII alphanumerics. The transform is lossy, so callers must detect
//! collisions afterwards. It never fixes a name up beyond stripping: an
//! empty result or a leading digit is reported, not repaired.

///
/// NameScope
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameScope {
    /// Top-level class names, used verbatim after stripping.
    Type,

    /// Component names (subobjects, levels, distance buckets).
    Component,

    /// Field names inside a component.
    Field,
}

/// Strip everything outside `[A-Za-z0-9]`, then apply scope casing.
#[must_use]
pub fn sanitize(raw: &str, scope: NameScope) -> String {
    let mut name: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();

    match scope {
        NameScope::Type => {}
        NameScope::Component => {
            if let Some(first) = name.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
        }
        NameScope::Field => name.make_ascii_lowercase(),
    }

    name
}

/// Ensure a sanitized name is usable as a schema identifier.
///
/// `identifier` is the offending path, `label` the kind of thing being named.
pub fn check_schema_name(name: &str, identifier: &str, label: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!(
            "{label} {identifier} is empty after removing non-alphanumeric characters"
        ));
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!(
            "{label} names should not start with digits: '{name}' ({identifier}) has leading digits, \
             possibly after removing non-alphanumeric characters"
        ));
    }

    Ok(())
}

/// Trailing asset segment of a class path (`/Game/Foo.Foo_C` -> `Foo_C`).
#[must_use]
pub fn asset_name(path: &str) -> &str {
    path.rsplit(['.', '/', ':']).next().unwrap_or(path)
}

///
/// TESTS
///

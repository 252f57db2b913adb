use crate::{
    err,
    error::ErrorTree,
    node::{Field, LevelAsset, TypeNode},
    sanitize::{NameScope, check_schema_name, sanitize},
    types::Category,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Check a top-level class name. Renames caused by stripping are logged.
pub fn validate_class_name(node: &TypeNode, errs: &mut ErrorTree) {
    let schema_name = sanitize(&node.name, NameScope::Type);

    if let Err(e) = check_schema_name(&schema_name, &node.path, "Class") {
        errs.add(e);
        return;
    }

    if schema_name != node.name {
        warn!(
            class = %node.path,
            "class '{}' will be named '{schema_name}' in schema",
            node.name
        );
    }
}

/// Check one field group: every name valid, no two names equal after
/// sanitizing. Both are fatal; a collision would merge two fields.
pub fn validate_field_names(category: Category, fields: &[Field], errs: &mut ErrorTree) {
    let label = category.field_label();
    let mut seen = BTreeMap::<String, &str>::new();

    for field in fields {
        let name = field.schema_name();

        if let Err(e) = check_schema_name(&name, &field.path, label) {
            errs.add(e);
        }

        if let Some(existing) = seen.get(&name) {
            err!(
                errs,
                "{label} name collision after removing non-alphanumeric characters: '{name}' collides for '{existing}' and '{}'",
                field.path
            );
        } else {
            seen.insert(name, &field.path);
        }
    }
}

/// Class paths are the identity of a class; the reflector must not repeat one.
pub fn validate_unique_class_paths(classes: &[TypeNode], errs: &mut ErrorTree) {
    let mut seen = BTreeSet::new();

    for class in classes {
        if !seen.insert(class.path.as_str()) {
            errs.add_for(
                class.path.clone(),
                format!("class '{}' is listed more than once", class.path),
            );
        }
    }
}

/// Level display names become component names. Each level path owns one
/// component id, so a path may only be listed once.
pub fn validate_level_names(levels: &[LevelAsset], errs: &mut ErrorTree) {
    let mut seen = BTreeMap::<&str, &str>::new();

    for level in levels {
        if let Err(e) = check_schema_name(&level.component_name(), &level.path, "Level") {
            errs.add_for(level.path.clone(), e);
        }
        if let Some(first) = seen.insert(level.path.as_str(), level.name.as_str()) {
            errs.add_for(
                level.path.clone(),
                format!(
                    "level '{}' is listed more than once (as '{first}' and '{}')",
                    level.path, level.name
                ),
            );
        }
    }
}

///
/// TESTS
///

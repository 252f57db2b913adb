use crate::{
    err,
    error::ErrorTree,
    node::TypeNode,
    sanitize::{NameScope, check_schema_name, sanitize},
};
use std::collections::{BTreeMap, BTreeSet};

/// Validate the sibling groups owned by a class or subobject: one field
/// group per category, and unique subobject names among its children.
pub fn validate_groups(node: &TypeNode, errs: &mut ErrorTree) {
    validate_category_groups(node, errs);
    validate_subobject_names(node, errs);
}

fn validate_category_groups(node: &TypeNode, errs: &mut ErrorTree) {
    let mut seen = BTreeSet::new();

    for (category, _) in node.field_groups() {
        if !seen.insert(category) {
            err!(
                errs,
                "'{}' has more than one {category} field group",
                node.path
            );
        }
    }
}

fn validate_subobject_names(node: &TypeNode, errs: &mut ErrorTree) {
    let mut seen = BTreeMap::<String, &str>::new();

    for subobject in node.subobjects() {
        let name = sanitize(&subobject.name, NameScope::Component);

        if let Err(e) = check_schema_name(&name, &subobject.path, "Subobject") {
            errs.add(e);
        }

        if let Some(existing) = seen.get(&name) {
            err!(
                errs,
                "Subobject name collision after removing non-alphanumeric characters: '{name}' collides for '{existing}' and '{}'",
                subobject.path
            );
        } else {
            seen.insert(name, &subobject.path);
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{node::Field, types::Category};

    #[test]
    fn subobject_collision_is_fatal() {
        let node = TypeNode::root_class("/Game/A.A_C", "A_C")
            .with_child(TypeNode::subobject("/Game/A.A_C:Mesh_1", "Mesh_1"))
            .with_child(TypeNode::subobject("/Game/A.A_C:Mesh1", "Mesh1"));

        let mut errs = ErrorTree::new();
        validate_groups(&node, &mut errs);

        assert_eq!(errs.len(), 1, "errors: {errs}");
        assert!(errs.to_string().contains("Subobject name collision"));
    }

    #[test]
    fn duplicate_category_groups_are_rejected() {
        let node = TypeNode::root_class("/Game/A.A_C", "A_C")
            .with_fields(
                Category::State,
                vec![Field::new("/Game/A.A_C:X", "X", "int32")],
            )
            .with_fields(
                Category::State,
                vec![Field::new("/Game/A.A_C:Y", "Y", "int32")],
            );

        let mut errs = ErrorTree::new();
        validate_groups(&node, &mut errs);

        assert!(errs.to_string().contains("more than one State field group"));
    }

    #[test]
    fn nested_subobjects_have_independent_namespaces() {
        let node = TypeNode::root_class("/Game/A.A_C", "A_C").with_child(
            TypeNode::subobject("/Game/A.A_C:Arm", "Arm")
                .with_child(TypeNode::subobject("/Game/A.A_C:Arm:Arm", "Arm")),
        );

        let mut errs = ErrorTree::new();
        validate_groups(&node, &mut errs);

        assert!(errs.is_empty(), "errors: {errs}");
    }
}

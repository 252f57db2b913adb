use crate::{
    err,
    error::ErrorTree,
    node::{NodeKind, TypeNode},
    validate::{group, naming},
};

///
/// Visitor
/// depth-first, parents before children
///

pub trait Visitor {
    fn enter(&mut self, node: &TypeNode);

    fn exit(&mut self, _node: &TypeNode) {}
}

impl TypeNode {
    /// Walk this node and every descendant.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.enter(self);
        for child in &self.children {
            child.accept(visitor);
        }
        visitor.exit(self);
    }
}

///
/// NodeTag
/// what the visitor remembers about each ancestor
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NodeTag {
    Class,
    Subobject,
    FieldGroup,
}

impl From<&NodeKind> for NodeTag {
    fn from(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Class { .. } => Self::Class,
            NodeKind::Subobject => Self::Subobject,
            NodeKind::FieldGroup { .. } => Self::FieldGroup,
        }
    }
}

///
/// ValidateVisitor
///
/// Runs the per-node checks and files every error under the path of the
/// top-level class being walked, so one bad class never hides another.
///

#[derive(Debug, Default)]
pub struct ValidateVisitor {
    pub errors: ErrorTree,
    route: Option<String>,
    stack: Vec<NodeTag>,
}

impl ValidateVisitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, result: Result<(), ErrorTree>) {
        if let Err(errs) = result {
            match &self.route {
                Some(route) => self.errors.merge_for(route.clone(), errs),
                None => self.errors.merge(errs),
            }
        }
    }
}

impl Visitor for ValidateVisitor {
    fn enter(&mut self, node: &TypeNode) {
        if self.stack.is_empty() {
            self.route = Some(node.path.clone());
        }

        let parent = self.stack.last().copied();
        let mut errs = ErrorTree::new();

        match (&node.kind, parent) {
            // top level
            (NodeKind::Class { .. }, None) => {
                naming::validate_class_name(node, &mut errs);
                group::validate_groups(node, &mut errs);
            }
            (_, None) => {
                err!(errs, "top-level node '{}' is not a class", node.path);
            }

            // nested
            (NodeKind::Class { .. }, Some(_)) => {
                err!(
                    errs,
                    "class '{}' cannot be nested inside another node; list it at the top level",
                    node.path
                );
            }
            (NodeKind::Subobject, Some(NodeTag::Class | NodeTag::Subobject)) => {
                group::validate_groups(node, &mut errs);
            }
            (NodeKind::FieldGroup { category, fields }, Some(NodeTag::Class | NodeTag::Subobject)) => {
                if !node.children.is_empty() {
                    err!(errs, "field group '{}' cannot have children", node.path);
                }
                naming::validate_field_names(*category, fields, &mut errs);
            }
            (_, Some(NodeTag::FieldGroup)) => {
                err!(errs, "node '{}' is nested inside a field group", node.path);
            }
        }

        self.record(errs.result());
        self.stack.push(NodeTag::from(&node.kind));
    }

    fn exit(&mut self, _node: &TypeNode) {
        self.stack.pop();
        if self.stack.is_empty() {
            self.route = None;
        }
    }
}

//! Type graph validation orchestration and shared helpers.
//!
//! Validation never touches generator state and never stops early: the
//! whole graph is walked and every problem is reported at once.

pub mod group;
pub mod naming;

use crate::{
    error::ErrorTree,
    node::{LevelAsset, TypeNode},
    visit::ValidateVisitor,
};

/// Run full validation in a staged, deterministic order.
pub fn validate_graph(classes: &[TypeNode], levels: &[LevelAsset]) -> Result<(), ErrorTree> {
    // Phase 1: validate each node (structural + local invariants).
    let mut errors = validate_nodes(classes);

    // Phase 2: enforce graph-wide invariants.
    validate_global(classes, levels, &mut errors);

    errors.result()
}

// Validate all nodes via a visitor to retain route-aware error aggregation.
fn validate_nodes(classes: &[TypeNode]) -> ErrorTree {
    let mut visitor = ValidateVisitor::new();
    for class in classes {
        class.accept(&mut visitor);
    }

    visitor.errors
}

// Run global validation passes that require a full graph view.
fn validate_global(classes: &[TypeNode], levels: &[LevelAsset], errors: &mut ErrorTree) {
    naming::validate_unique_class_paths(classes, errors);
    naming::validate_level_names(levels, errors);
}

///
/// TESTS
///

use derive_more::Display;
use schemagen_schema::node::TypeNode;

/// Name prefixes the host gives to transient generated classes.
const TRANSIENT_PREFIXES: [&str; 7] = [
    "SKEL_",
    "REINST_",
    "TRASHCLASS_",
    "HOTRELOADED_",
    "PROTO_BP_",
    "PLACEHOLDER-CLASS_",
    "ORPHANED_DATA_ONLY_",
];

///
/// SkipReason
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum SkipReason {
    #[display("not a class")]
    NotAClass,

    #[display("editor-only")]
    EditorOnly,

    #[display("not a spatial type")]
    NotSpatialType,

    #[display("layout-changing")]
    LayoutChanging,

    #[display("transient generated class")]
    Transient,

    #[display("under never-cook directory {_0}")]
    NeverCooked(String),
}

///
/// SupportFilter
///
/// Decides which classes get schema. Everything else is left out of the
/// pass entirely and keeps whatever the database already holds for it.
///

#[derive(Clone, Debug, Default)]
pub struct SupportFilter {
    never_cook_dirs: Vec<String>,
}

impl SupportFilter {
    #[must_use]
    pub const fn new(never_cook_dirs: Vec<String>) -> Self {
        Self { never_cook_dirs }
    }

    #[must_use]
    pub fn skip_reason(&self, node: &TypeNode) -> Option<SkipReason> {
        let Some(flags) = node.class_flags() else {
            return Some(SkipReason::NotAClass);
        };

        if flags.editor_only {
            return Some(SkipReason::EditorOnly);
        }
        if !flags.spatial_type {
            return Some(SkipReason::NotSpatialType);
        }
        if flags.layout_changing {
            return Some(SkipReason::LayoutChanging);
        }
        if TRANSIENT_PREFIXES
            .iter()
            .any(|prefix| node.name.starts_with(prefix))
        {
            return Some(SkipReason::Transient);
        }

        self.never_cook_dirs
            .iter()
            .find(|dir| node.path.starts_with(dir.as_str()))
            .map(|dir| SkipReason::NeverCooked(dir.clone()))
    }

    #[must_use]
    pub fn is_supported(&self, node: &TypeNode) -> bool {
        self.skip_reason(node).is_none()
    }
}

///
/// TESTS
///

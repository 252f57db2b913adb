use crate::prelude::*;
use derive_more::{Display, FromStr};

///
/// Category
///
/// Component partition a field belongs to. Every category of a class gets
/// its own component (and therefore its own id).
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    State,
    OwnerRestricted,
    Transferable,
}

impl Category {
    /// Emission order. Never reorder; ids are allocated in this order.
    pub const ALL: [Self; 3] = [Self::State, Self::OwnerRestricted, Self::Transferable];

    /// Suffix appended to the component name for this category.
    #[must_use]
    pub const fn component_suffix(self) -> &'static str {
        match self {
            Self::State => "",
            Self::OwnerRestricted => "OwnerOnly",
            Self::Transferable => "Handover",
        }
    }

    /// Human label used in validation messages.
    #[must_use]
    pub const fn field_label(self) -> &'static str {
        match self {
            Self::State => "Replicated property",
            Self::OwnerRestricted => "Owner-only property",
            Self::Transferable => "Handover property",
        }
    }
}

///
/// ClassKind
///
/// Hierarchy roots own their components directly; subobject classes are
/// attached to roots at runtime through dynamic slots.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize)]
#[remain::sorted]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Root,
    Subobject,
}

///
/// ClassFlags
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ClassFlags {
    pub editor_only: bool,
    pub spatial_type: bool,
    pub layout_changing: bool,
}

impl Default for ClassFlags {
    fn default() -> Self {
        Self {
            editor_only: false,
            spatial_type: true,
            layout_changing: false,
        }
    }
}

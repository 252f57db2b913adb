use derive_more::Display;
use serde::{Deserialize, Serialize};

/// First id handed out by a fresh database. Everything below is reserved
/// for hand-written components.
pub const BASELINE_COMPONENT_ID: ComponentId = ComponentId::new(10_000);

/// Never assigned; marks "no component".
pub const INVALID_COMPONENT_ID: ComponentId = ComponentId::new(0);

///
/// ComponentId
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct ComponentId(u32);

impl ComponentId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != INVALID_COMPONENT_ID.0
    }
}

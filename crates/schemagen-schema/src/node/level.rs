use crate::prelude::*;

///
/// LevelAsset
/// A streaming level known to the host; `name` is its display name.
///

#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct LevelAsset {
    pub name: String,
    pub path: String,
}

impl LevelAsset {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn component_name(&self) -> String {
        sanitize(&self.name, NameScope::Component)
    }
}

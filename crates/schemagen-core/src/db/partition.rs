use crate::{schema::types::Category, types::ComponentId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

///
/// ComponentPartitions
///
/// Component assignments split by category; each map is keyed by the
/// owning path (class, static subobject or dynamic slot).
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ComponentPartitions {
    #[serde(default)]
    pub state: BTreeMap<String, ComponentId>,

    #[serde(default)]
    pub owner_restricted: BTreeMap<String, ComponentId>,

    #[serde(default)]
    pub transferable: BTreeMap<String, ComponentId>,
}

impl ComponentPartitions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: BTreeMap::new(),
            owner_restricted: BTreeMap::new(),
            transferable: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn get(&self, category: Category) -> &BTreeMap<String, ComponentId> {
        match category {
            Category::State => &self.state,
            Category::OwnerRestricted => &self.owner_restricted,
            Category::Transferable => &self.transferable,
        }
    }

    pub const fn get_mut(&mut self, category: Category) -> &mut BTreeMap<String, ComponentId> {
        match category {
            Category::State => &mut self.state,
            Category::OwnerRestricted => &mut self.owner_restricted,
            Category::Transferable => &mut self.transferable,
        }
    }

    /// All ids of one category.
    #[must_use]
    pub fn ids(&self, category: Category) -> BTreeSet<ComponentId> {
        self.get(category).values().copied().collect()
    }

    /// Every assignment, category by category.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str, ComponentId)> {
        Category::ALL.into_iter().flat_map(move |category| {
            self.get(category)
                .iter()
                .map(move |(path, id)| (category, path.as_str(), *id))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len() + self.owner_restricted.len() + self.transferable.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! The schema database: the single persisted record of every name and id
//! the generator has ever handed out.

mod partition;
mod store;

pub use partition::*;
pub use store::*;

use crate::{
    allocator::{AllocatorError, ComponentIdAllocator},
    schema::{err, error::ErrorTree, types::{Category, ClassKind}},
    types::{BASELINE_COMPONENT_ID, ComponentId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, btree_map::Entry};

/// Written into every saved database. Readers accept any version; new
/// versions may only add optional maps.
pub const DATABASE_FORMAT_VERSION: u32 = 2;

///
/// ClassRecord
/// the persisted schema identity of a class path
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClassRecord {
    pub schema_name: String,
    pub class: ClassKind,
}

///
/// SchemaDatabase
///
/// Aggregate root. Loaded at the start of a pass, mutated in memory by the
/// generator, and saved whole at the end of a successful pass. Entries are
/// never removed: a class that disappears keeps its name and ids reserved.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SchemaDatabase {
    #[serde(default)]
    pub format_version: u32,

    /// Watermark: the next unused component id.
    pub next_component_id: ComponentId,

    #[serde(default)]
    pub classes: BTreeMap<String, ClassRecord>,

    #[serde(default)]
    pub components: ComponentPartitions,

    #[serde(default)]
    pub levels: BTreeMap<String, ComponentId>,

    #[serde(default)]
    pub distance_buckets: BTreeMap<u64, ComponentId>,

    /// Reverse lookup for runtimes; rebuilt on every save.
    #[serde(default)]
    pub component_index: BTreeMap<ComponentId, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor_hash: Option<u64>,
}

impl Default for SchemaDatabase {
    fn default() -> Self {
        Self::fresh()
    }
}

impl SchemaDatabase {
    /// An empty database with the allocator at its baseline.
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            format_version: DATABASE_FORMAT_VERSION,
            next_component_id: BASELINE_COMPONENT_ID,
            classes: BTreeMap::new(),
            components: ComponentPartitions::new(),
            levels: BTreeMap::new(),
            distance_buckets: BTreeMap::new(),
            component_index: BTreeMap::new(),
            descriptor_hash: None,
        }
    }

    /// Class mappings with the watermark still at baseline can only come
    /// from tooling that renumbered on every run; such a database cannot
    /// promise ids were never reused.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        !self.classes.is_empty() && self.next_component_id == BASELINE_COMPONENT_ID
    }

    #[must_use]
    pub fn allocator(&self) -> ComponentIdAllocator {
        ComponentIdAllocator::new(self.next_component_id)
    }

    //
    // identities
    //

    #[must_use]
    pub fn identity(&self, class_path: &str) -> Option<&ClassRecord> {
        self.classes.get(class_path)
    }

    /// Record a schema identity. An existing identity is never replaced.
    pub fn record_identity(&mut self, class_path: &str, schema_name: &str, class: ClassKind) {
        self.classes
            .entry(class_path.to_string())
            .or_insert_with(|| ClassRecord {
                schema_name: schema_name.to_string(),
                class,
            });
    }

    //
    // components
    //

    #[must_use]
    pub fn component(&self, category: Category, path: &str) -> Option<ComponentId> {
        self.components.get(category).get(path).copied()
    }

    /// The id for `(category, path)`, allocating one the first time.
    pub fn assign_component(
        &mut self,
        category: Category,
        path: &str,
        alloc: &mut ComponentIdAllocator,
    ) -> Result<ComponentId, AllocatorError> {
        assign(self.components.get_mut(category), path.to_string(), alloc)
    }

    pub fn assign_level(
        &mut self,
        level_path: &str,
        alloc: &mut ComponentIdAllocator,
    ) -> Result<ComponentId, AllocatorError> {
        assign(&mut self.levels, level_path.to_string(), alloc)
    }

    pub fn assign_distance(
        &mut self,
        distance_squared: u64,
        alloc: &mut ComponentIdAllocator,
    ) -> Result<ComponentId, AllocatorError> {
        assign(&mut self.distance_buckets, distance_squared, alloc)
    }

    /// Every id in the database with the entity that owns it.
    #[must_use]
    pub fn component_owners(&self) -> Vec<(ComponentId, String)> {
        let mut owners: Vec<(ComponentId, String)> = self
            .components
            .iter()
            .map(|(_, path, id)| (id, path.to_string()))
            .collect();

        owners.extend(self.levels.iter().map(|(path, id)| (*id, path.clone())));
        owners.extend(
            self.distance_buckets
                .iter()
                .map(|(distance, id)| (*id, format!("distance:{distance}"))),
        );

        owners
    }

    pub fn rebuild_index(&mut self) {
        self.component_index = self.component_owners().into_iter().collect();
    }

    /// Verify the non-reuse invariants: every id valid, below the
    /// watermark and unique across all maps; every schema name unique.
    pub fn check_integrity(&self) -> Result<(), ErrorTree> {
        let mut errs = ErrorTree::new();

        if self.next_component_id < BASELINE_COMPONENT_ID {
            err!(
                errs,
                "watermark {} is below the baseline {BASELINE_COMPONENT_ID}",
                self.next_component_id
            );
        }

        let mut seen = BTreeMap::<ComponentId, String>::new();
        for (id, owner) in self.component_owners() {
            if !id.is_valid() {
                errs.add_for(owner.clone(), "has the invalid component id 0");
            } else if id >= self.next_component_id {
                errs.add_for(
                    owner.clone(),
                    format!(
                        "component id {id} is not below the watermark {}",
                        self.next_component_id
                    ),
                );
            }

            match seen.entry(id) {
                Entry::Occupied(existing) => errs.add_for(
                    owner.clone(),
                    format!("component id {id} is also assigned to '{}'", existing.get()),
                ),
                Entry::Vacant(slot) => {
                    slot.insert(owner);
                }
            }
        }

        let mut names = BTreeMap::<&str, &str>::new();
        for (path, record) in &self.classes {
            if let Some(existing) = names.insert(&record.schema_name, path) {
                errs.add_for(
                    path.clone(),
                    format!(
                        "schema name '{}' is also used by '{existing}'",
                        record.schema_name
                    ),
                );
            }
        }

        errs.result()
    }
}

// get or allocate
fn assign<K: Ord>(
    map: &mut BTreeMap<K, ComponentId>,
    key: K,
    alloc: &mut ComponentIdAllocator,
) -> Result<ComponentId, AllocatorError> {
    match map.entry(key) {
        Entry::Occupied(entry) => Ok(*entry.get()),
        Entry::Vacant(entry) => Ok(*entry.insert(alloc.next()?)),
    }
}

///
/// TESTS
///

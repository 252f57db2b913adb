use crate::{
    db::SchemaDatabase,
    schema::sanitize::{NameScope, asset_name, sanitize},
};
use std::collections::BTreeMap;
use tracing::warn;

///
/// NameClaim
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NameClaim {
    pub path: String,
    pub schema_name: String,
}

///
/// CollisionGroup
/// every path that wanted the same sanitized name, with what it got
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollisionGroup {
    pub desired: String,
    pub claims: Vec<NameClaim>,
}

impl CollisionGroup {
    /// `path(finalName)` list used in the warning line.
    #[must_use]
    pub fn describe(&self) -> String {
        self.claims
            .iter()
            .map(|claim| format!("{}({})", claim.path, claim.schema_name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

///
/// CollisionRegistry
///
/// Reserves top-level schema names for one pass. Paths must be resolved in
/// ascending path order; the registry itself never reorders anything, so
/// the outcome depends only on that order and on the seeded database.
///
/// Names are reserved case-insensitively: schema names become file and
/// package names, and those must not differ only by case.
///

#[derive(Debug, Default)]
pub struct CollisionRegistry {
    by_path: BTreeMap<String, String>,
    taken: BTreeMap<String, String>,
    desired: BTreeMap<String, Vec<NameClaim>>,
}

impl CollisionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every identity the database already holds.
    #[must_use]
    pub fn seed(db: &SchemaDatabase) -> Self {
        let mut registry = Self::new();

        for (path, record) in &db.classes {
            let desired = sanitize(asset_name(path), NameScope::Type);
            registry.claim(path, desired, &record.schema_name);
        }

        registry
    }

    /// Resolve the schema name for `path`, whose raw name is `raw`.
    ///
    /// A path that already has a name keeps it. Otherwise the sanitized raw
    /// name is reserved if free, else `raw1`, `raw2`, ... are sanitized in
    /// turn until one is.
    pub fn resolve(&mut self, path: &str, raw: &str) -> String {
        if let Some(existing) = self.by_path.get(path) {
            return existing.clone();
        }

        let desired = sanitize(raw, NameScope::Type);
        let holder = self.taken.get(&fold(&desired)).cloned();

        let mut candidate = desired.clone();
        let mut suffix: u32 = 1;
        while self.is_taken(&candidate) {
            candidate = sanitize(&format!("{raw}{suffix}"), NameScope::Type);
            suffix += 1;
        }

        // a holder spelled with different case groups under its own name
        if let Some(holder) = holder
            && holder != desired
        {
            self.file(holder, path, &candidate);
        }
        self.claim(path, desired, &candidate);

        candidate
    }

    #[must_use]
    pub fn schema_name(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains_key(&fold(name))
    }

    /// Desired names claimed by more than one path, in name order.
    #[must_use]
    pub fn collisions(&self) -> Vec<CollisionGroup> {
        self.desired
            .iter()
            .filter(|(_, claims)| claims.len() > 1)
            .map(|(desired, claims)| CollisionGroup {
                desired: desired.clone(),
                claims: claims.clone(),
            })
            .collect()
    }

    /// Warn once per collision group. Returns the groups for reporting.
    pub fn log_collisions(&self) -> Vec<CollisionGroup> {
        let groups = self.collisions();

        for group in &groups {
            warn!(
                desired = %group.desired,
                "schema name collision, resolved as: {}",
                group.describe()
            );
        }

        groups
    }

    // filed under the final name too, so whoever later wants that name
    // shows up in the same group as its holder
    fn claim(&mut self, path: &str, desired: String, schema_name: &str) {
        self.by_path
            .insert(path.to_string(), schema_name.to_string());
        self.taken
            .entry(fold(schema_name))
            .or_insert_with(|| schema_name.to_string());

        if desired != schema_name {
            self.file(schema_name.to_string(), path, schema_name);
        }
        self.file(desired, path, schema_name);
    }

    fn file(&mut self, group: String, path: &str, schema_name: &str) {
        self.desired.entry(group).or_default().push(NameClaim {
            path: path.to_string(),
            schema_name: schema_name.to_string(),
        });
    }
}

fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

///
/// TESTS
///

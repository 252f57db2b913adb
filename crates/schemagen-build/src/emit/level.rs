use super::{SUBLEVELS_FILE, SchemaEmitter};
use crate::{EmitError, writer::CodeWriter};
use schemagen_core::{
    allocator::ComponentIdAllocator,
    db::SchemaDatabase,
    schema::node::LevelAsset,
};
use std::collections::{BTreeMap, BTreeSet};

impl SchemaEmitter {
    /// Emit one component per streaming level. Levels whose display names
    /// sanitize alike are told apart by `Ind<i>`, with `i` following the
    /// sorted level paths. Returns the number of components written.
    pub fn emit_levels(
        &self,
        levels: &[LevelAsset],
        db: &mut SchemaDatabase,
        alloc: &mut ComponentIdAllocator,
    ) -> Result<usize, EmitError> {
        let mut groups = BTreeMap::<String, BTreeSet<&str>>::new();
        for level in levels {
            groups
                .entry(level.component_name())
                .or_default()
                .insert(&level.path);
        }

        let mut writer = CodeWriter::schema_file("unreal.sublevels");
        let mut written = 0;

        for (name, paths) in &groups {
            let indexed = paths.len() > 1;

            for (i, path) in paths.iter().enumerate() {
                let id = db.assign_level(path, alloc)?;
                let component = if indexed {
                    format!("{name}Ind{i}")
                } else {
                    name.clone()
                };

                writer.blank();
                writer.line(format!("// {path}"));
                writer.open(format!("component {component}"));
                writer.line(format!("id = {id};"));
                writer.close();
                written += 1;
            }
        }

        let file = self.schema_dir.join(SUBLEVELS_FILE);
        writer
            .write_to(&file)
            .map_err(|e| EmitError::io("write sublevel schema", &file, e))?;

        Ok(written)
    }
}

///
/// TESTS
///

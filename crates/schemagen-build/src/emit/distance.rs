use super::{DISTANCES_FILE, SchemaEmitter};
use crate::{EmitError, writer::CodeWriter};
use schemagen_core::{allocator::ComponentIdAllocator, db::SchemaDatabase};
use std::collections::BTreeSet;

impl SchemaEmitter {
    /// Assign ids to new cull distance buckets, then emit every bucket the
    /// database knows about. Returns the number of components written.
    pub fn emit_distances(
        &self,
        distances: &BTreeSet<u64>,
        db: &mut SchemaDatabase,
        alloc: &mut ComponentIdAllocator,
    ) -> Result<usize, EmitError> {
        for distance in distances {
            db.assign_distance(*distance, alloc)?;
        }

        let mut writer = CodeWriter::schema_file("unreal.ncdcomponents");
        for (distance, id) in &db.distance_buckets {
            writer.blank();
            writer.line(format!("// distance {distance}"));
            writer.open(format!("component NetCullDistanceSquared{distance}"));
            writer.line(format!("id = {id};"));
            writer.close();
        }

        let file = self.schema_dir.join(DISTANCES_FILE);
        writer
            .write_to(&file)
            .map_err(|e| EmitError::io("write distance schema", &file, e))?;

        Ok(db.distance_buckets.len())
    }
}

///
/// TESTS
///

use super::{SUBOBJECTS_DIR, SchemaEmitter, class_package};
use crate::{EmitError, writer::CodeWriter};
use schemagen_core::{
    allocator::ComponentIdAllocator,
    db::SchemaDatabase,
    schema::{
        node::{Field, TypeNode},
        sanitize::{NameScope, sanitize},
        types::{Category, ClassKind},
    },
};
use std::path::PathBuf;

impl SchemaEmitter {
    /// Emit one class file and return its path.
    ///
    /// Root classes get one component per category that has fields, then
    /// their static subobjects depth-first. Subobject classes get one data
    /// type per category plus the dynamic slot components that carry it.
    pub fn emit_class(
        &self,
        node: &TypeNode,
        schema_name: &str,
        db: &mut SchemaDatabase,
        alloc: &mut ComponentIdAllocator,
    ) -> Result<PathBuf, EmitError> {
        let class = node
            .class_kind()
            .ok_or_else(|| EmitError::NotAClass(node.path.clone()))?;

        let mut writer = CodeWriter::schema_file(&class_package(schema_name));
        let file = match class {
            ClassKind::Root => {
                emit_tree(&mut writer, node, schema_name, db, alloc)?;

                self.schema_dir.join(format!("{schema_name}.schema"))
            }
            ClassKind::Subobject => {
                self.emit_subobject_class(&mut writer, node, schema_name, db, alloc)?;

                self.schema_dir
                    .join(SUBOBJECTS_DIR)
                    .join(format!("{schema_name}.schema"))
            }
        };

        writer
            .write_to(&file)
            .map_err(|e| EmitError::io("write schema", &file, e))?;

        Ok(file)
    }

    fn emit_subobject_class(
        &self,
        writer: &mut CodeWriter,
        node: &TypeNode,
        schema_name: &str,
        db: &mut SchemaDatabase,
        alloc: &mut ComponentIdAllocator,
    ) -> Result<(), EmitError> {
        let categories = node.applicable_categories();

        for category in &categories {
            writer.blank();
            writer.line(format!("// {}", node.path));
            writer.open(format!("type {}", data_type(schema_name, *category)));
            write_fields(writer, &node.fields(*category));
            writer.close();
        }

        for slot in 1..=self.dynamic_slots {
            let slot_path = format!("{}#{slot}", node.path);

            for category in &categories {
                let id = db.assign_component(*category, &slot_path, alloc)?;

                writer.blank();
                writer.open(format!(
                    "component {schema_name}Dynamic{slot}{}",
                    category.component_suffix()
                ));
                writer.line(format!("id = {id};"));
                writer.line(format!("{} data = 1;", data_type(schema_name, *category)));
                writer.close();
            }
        }

        for sub in node.subobjects() {
            let name = format!("{schema_name}{}", sanitize(&sub.name, NameScope::Component));
            emit_tree(writer, sub, &name, db, alloc)?;
        }

        Ok(())
    }
}

fn data_type(schema_name: &str, category: Category) -> String {
    format!("{schema_name}{}Data", category.component_suffix())
}

// components of `node`, then of every static subobject beneath it
fn emit_tree(
    writer: &mut CodeWriter,
    node: &TypeNode,
    name: &str,
    db: &mut SchemaDatabase,
    alloc: &mut ComponentIdAllocator,
) -> Result<(), EmitError> {
    for category in node.applicable_categories() {
        let id = db.assign_component(category, &node.path, alloc)?;

        writer.blank();
        writer.line(format!("// {}", node.path));
        writer.open(format!("component {name}{}", category.component_suffix()));
        writer.line(format!("id = {id};"));
        write_fields(writer, &node.fields(category));
        writer.close();
    }

    for sub in node.subobjects() {
        let sub_name = format!("{name}{}", sanitize(&sub.name, NameScope::Component));
        emit_tree(writer, sub, &sub_name, db, alloc)?;
    }

    Ok(())
}

fn write_fields(writer: &mut CodeWriter, fields: &[&Field]) {
    for (i, field) in fields.iter().enumerate() {
        let ty = if field.repeated {
            format!("list<{}>", field.ty)
        } else {
            field.ty.clone()
        };

        writer.line(format!("{ty} {} = {};", field.schema_name(), i + 1));
    }
}

///
/// TESTS
///

#![allow(dead_code)]

use schemagen::{
    build::{CompileError, CompileOutput, CompilerInvocation, SchemaCompiler},
    config::Config,
    schema::prelude::*,
};
use std::{fs, path::Path};
use tempfile::TempDir;

///
/// StubCompiler
/// writes a descriptor derived from the emitted schema, or fails
///

#[derive(Clone, Debug, Default)]
pub struct StubCompiler {
    pub exit_code: Option<i32>,
    pub skip_descriptor: bool,
}

impl StubCompiler {
    pub fn failing(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            skip_descriptor: false,
        }
    }
}

impl SchemaCompiler for StubCompiler {
    fn compile(&self, invocation: &CompilerInvocation) -> Result<CompileOutput, CompileError> {
        invocation.prepare_output()?;

        if let Some(code) = self.exit_code {
            return Err(CompileError::Failed {
                code: Some(code),
                stdout: String::new(),
                stderr: "error: stub failure".to_string(),
            });
        }
        if !self.skip_descriptor {
            let args = invocation.args().join(" ");
            fs::write(invocation.descriptor_path(), args).map_err(|source| CompileError::Io {
                action: "write descriptor",
                path: invocation.descriptor_path(),
                source,
            })?;
        }

        Ok(CompileOutput::default())
    }
}

/// Config rooted in a fresh temporary project directory.
pub fn project() -> (TempDir, Config) {
    let dir = TempDir::new().expect("tempdir");
    let config = Config::defaults_at(dir.path());

    (dir, config)
}

pub fn with_batch_size(mut config: Config, batch_size: usize) -> Config {
    config.generator.batch_size = batch_size;
    config
}

/// A root class with one replicated field.
pub fn actor(path: &str, name: &str) -> TypeNode {
    TypeNode::root_class(path, name).with_fields(
        Category::State,
        vec![Field::new(format!("{path}:Health"), "Health", "int32")],
    )
}

/// Every file under `dir`, relative path to contents.
pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files = Vec::new();
    collect(dir, dir, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<(String, Vec<u8>)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path
                .strip_prefix(root)
                .expect("under root")
                .display()
                .to_string();
            files.push((relative, fs::read(&path).expect("read file")));
        }
    }
}

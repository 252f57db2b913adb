//! External schema compiler invocation.

use schemagen_config_build::CompilerConfig;
use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};
use thiserror::Error as ThisError;
use tracing::{error, info};

/// Passthrough switches that make the compiler write into `ast/`.
const AST_SWITCHES: [&str; 2] = ["ast_proto_out", "ast_json_out"];

///
/// CompileError
///

#[derive(Debug, ThisError)]
pub enum CompileError {
    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to start schema compiler '{}': {source}", .exe.display())]
    Spawn { exe: PathBuf, source: io::Error },

    #[error(
        "schema compiler exited with {}:\n{stderr}",
        .code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
    )]
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

///
/// CompileOutput
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompileOutput {
    pub stdout: String,
    pub stderr: String,
}

///
/// CompilerInvocation
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompilerInvocation {
    pub exe: PathBuf,
    pub schema_paths: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub additional_args: Option<String>,
}

impl CompilerInvocation {
    #[must_use]
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            exe: config.exe.clone(),
            schema_paths: config.schema_paths.clone(),
            output_dir: config.output_dir.clone(),
            additional_args: config.additional_args.clone(),
        }
    }

    #[must_use]
    pub fn descriptor_path(&self) -> PathBuf {
        self.output_dir.join("schema.descriptor")
    }

    #[must_use]
    pub fn bundle_path(&self) -> PathBuf {
        self.output_dir.join("schema.sb")
    }

    #[must_use]
    pub fn bundle_json_path(&self) -> PathBuf {
        self.output_dir.join("schema.json")
    }

    #[must_use]
    pub fn ast_dir(&self) -> PathBuf {
        self.output_dir.join("ast")
    }

    /// Passthrough arguments, outer quotes trimmed.
    #[must_use]
    pub fn passthrough(&self) -> Vec<String> {
        self.additional_args
            .as_deref()
            .map(|args| args.trim().trim_matches('"').trim())
            .map(|args| args.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn wants_ast(&self) -> bool {
        self.additional_args
            .as_deref()
            .is_some_and(|args| AST_SWITCHES.iter().any(|switch| args.contains(switch)))
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .schema_paths
            .iter()
            .map(|path| format!("--schema_path={}", path.display()))
            .collect();

        args.push(format!("--descriptor_set_out={}", self.descriptor_path().display()));
        args.push(format!("--bundle_out={}", self.bundle_path().display()));
        args.push(format!("--bundle_json_out={}", self.bundle_json_path().display()));
        args.push("--load_all_schema_on_schema_path".to_string());
        args.extend(self.passthrough());

        args
    }

    /// The full command line, for logs.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.exe.display().to_string();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg);
        }

        line
    }

    /// Remove compiled output of earlier passes and create the directories
    /// the compiler expects to exist.
    pub fn prepare_output(&self) -> Result<(), CompileError> {
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir)
                .map_err(|e| io_error("clear compiled schema directory", &self.output_dir, e))?;
        }

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| io_error("create compiled schema directory", &self.output_dir, e))?;

        if self.wants_ast() {
            let ast = self.ast_dir();
            fs::create_dir_all(&ast).map_err(|e| io_error("create AST directory", &ast, e))?;
        }

        Ok(())
    }
}

fn io_error(action: &'static str, path: &Path, source: io::Error) -> CompileError {
    CompileError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}

///
/// SchemaCompiler
///

pub trait SchemaCompiler {
    fn compile(&self, invocation: &CompilerInvocation) -> Result<CompileOutput, CompileError>;
}

///
/// ProcessCompiler
/// runs the compiler executable and waits for it
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessCompiler;

impl SchemaCompiler for ProcessCompiler {
    fn compile(&self, invocation: &CompilerInvocation) -> Result<CompileOutput, CompileError> {
        invocation.prepare_output()?;
        info!("running {}", invocation.command_line());

        let output = Command::new(&invocation.exe)
            .args(invocation.args())
            .output()
            .map_err(|source| CompileError::Spawn {
                exe: invocation.exe.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            info!("schema compiler succeeded: {stdout}");

            Ok(CompileOutput { stdout, stderr })
        } else {
            error!("schema compiler failed: {stderr}");

            Err(CompileError::Failed {
                code: output.status.code(),
                stdout,
                stderr,
            })
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn invocation(output_dir: &Path, exe: &str, extra: Option<&str>) -> CompilerInvocation {
        CompilerInvocation {
            exe: PathBuf::from(exe),
            schema_paths: vec![PathBuf::from("/p/schema"), PathBuf::from("/p/std")],
            output_dir: output_dir.to_path_buf(),
            additional_args: extra.map(str::to_string),
        }
    }

    #[test]
    fn args_carry_paths_outputs_and_passthrough() {
        let inv = invocation(Path::new("/out"), "schema_compiler", Some("\"--foo --bar=1\""));

        assert_eq!(
            inv.args(),
            [
                "--schema_path=/p/schema",
                "--schema_path=/p/std",
                "--descriptor_set_out=/out/schema.descriptor",
                "--bundle_out=/out/schema.sb",
                "--bundle_json_out=/out/schema.json",
                "--load_all_schema_on_schema_path",
                "--foo",
                "--bar=1",
            ]
        );
        assert!(!inv.wants_ast());
    }

    #[test]
    fn from_config_copies_every_setting() {
        let config = CompilerConfig {
            additional_args: Some("--ast_json_out=x".into()),
            ..CompilerConfig::default()
        };
        let inv = CompilerInvocation::from_config(&config);

        assert_eq!(inv.exe, config.exe);
        assert_eq!(inv.schema_paths, config.schema_paths);
        assert!(inv.wants_ast());
    }

    #[test]
    fn prepare_output_clears_old_artifacts_and_creates_ast_dir() {
        let dir = TempDir::new().expect("tempdir");
        let out = dir.path().join("assembly");
        fs::create_dir_all(&out).expect("mkdir");
        fs::write(out.join("schema.descriptor"), b"old").expect("write");

        let inv = invocation(&out, "schema_compiler", Some("--ast_proto_out=ast"));
        inv.prepare_output().expect("prepare");

        assert!(!inv.descriptor_path().exists());
        assert!(inv.ast_dir().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let dir = TempDir::new().expect("tempdir");
        let inv = invocation(&dir.path().join("out"), "true", None);

        ProcessCompiler.compile(&inv).expect("true exits 0");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_failure() {
        let dir = TempDir::new().expect("tempdir");
        let inv = invocation(&dir.path().join("out"), "false", None);

        let err = ProcessCompiler.compile(&inv).expect_err("false exits 1");
        assert!(
            matches!(err, CompileError::Failed { code: Some(1), .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let dir = TempDir::new().expect("tempdir");
        let inv = invocation(
            &dir.path().join("out"),
            "/definitely/not/a/schema_compiler",
            None,
        );

        let err = ProcessCompiler.compile(&inv).expect_err("no such executable");
        assert!(matches!(err, CompileError::Spawn { .. }), "got {err:?}");
    }
}

use std::{fmt::Write as _, fs, io, path::Path};

const INDENT: &str = "\t";

/// First lines of every generated file.
pub const GENERATED_BANNER: &str = "// Note that this file has been generated automatically";

///
/// CodeWriter
///
/// Line-oriented text builder with explicit indentation. Output depends
/// only on the calls made, so identical input always gives identical bytes.
///

#[derive(Debug, Default)]
pub struct CodeWriter {
    out: String,
    depth: usize,
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Banner plus `package` line.
    #[must_use]
    pub fn schema_file(package: &str) -> Self {
        let mut writer = Self::new();
        writer.line(GENERATED_BANNER);
        writer.line(format!("package {package};"));

        writer
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        let _ = writeln!(self.out, "{}", text.as_ref());

        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');

        self
    }

    /// `header {` and indent.
    pub fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;

        self
    }

    /// Outdent and `}`.
    pub fn close(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line("}")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    /// Write to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, &self.out)
    }
}

///
/// TESTS
///

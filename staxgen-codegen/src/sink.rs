//! Output routing for generated classes.
//!
//! A [`ClassSink`] receives one class at a time: [`begin`] acquires the
//! destination, [`write`] appends text and [`finish`] flushes and releases
//! it. Sinks guarantee that a class's destination is released before the
//! next one is acquired, so two classes never interleave in one file.
//!
//! [`begin`]: ClassSink::begin
//! [`write`]: ClassSink::write
//! [`finish`]: ClassSink::finish

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::error::{CodegenError, Result};

/// Destination for generated classes.
pub trait ClassSink {
    /// Acquire output for `class`, releasing whatever the previous class held.
    fn begin(&mut self, class: &str) -> Result<()>;

    /// Append text to the current class.
    fn write(&mut self, text: &str) -> Result<()>;

    /// Flush and release the current class's output.
    fn finish(&mut self) -> Result<()>;
}

/// Path of a class file relative to the output root, nested by package.
pub fn class_path(package: Option<&str>, class: &str) -> PathBuf {
    let mut path = PathBuf::new();
    if let Some(package) = package {
        path.extend(package.split('.').filter(|s| !s.is_empty()));
    }
    path.push(format!("{class}.java"));
    path
}

/// All classes go to one stream, in order, separated by a blank line.
pub struct StreamSink<W: Write> {
    out: W,
    label: PathBuf,
    started: bool,
}

impl<W: Write> StreamSink<W> {
    /// `label` names the stream in error messages (e.g., `<stdout>`).
    pub fn new(out: W, label: impl Into<PathBuf>) -> Self {
        Self {
            out,
            label: label.into(),
            started: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn io(&self, source: std::io::Error) -> CodegenError {
        CodegenError::io(&self.label, source)
    }
}

impl StreamSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout(), "<stdout>")
    }
}

impl<W: Write> ClassSink for StreamSink<W> {
    fn begin(&mut self, _class: &str) -> Result<()> {
        if self.started {
            self.out.write_all(b"\n").map_err(|e| self.io(e))?;
        }
        self.started = true;
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).map_err(|e| self.io(e))
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().map_err(|e| self.io(e))
    }
}

/// One `<Class>.java` file per class under a root directory.
pub struct DirectorySink {
    root: PathBuf,
    package: Option<String>,
    current: Option<(PathBuf, BufWriter<File>)>,
    created: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, package: Option<String>) -> Self {
        Self {
            root: root.into(),
            package,
            current: None,
            created: Vec::new(),
        }
    }

    /// Files created so far, in creation order.
    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn close_current(&mut self) -> Result<()> {
        if let Some((path, mut writer)) = self.current.take() {
            writer.flush().map_err(|e| CodegenError::io(&path, e))?;
        }
        Ok(())
    }
}

impl ClassSink for DirectorySink {
    fn begin(&mut self, class: &str) -> Result<()> {
        self.close_current()?;

        let path = self.root.join(class_path(self.package.as_deref(), class));
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| CodegenError::io(dir, e))?;
        }
        tracing::info!("Creating {}", path.display());
        let file = File::create(&path).map_err(|e| CodegenError::io(&path, e))?;

        self.created.push(path.clone());
        self.current = Some((path, BufWriter::new(file)));
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        match &mut self.current {
            Some((path, writer)) => writer
                .write_all(text.as_bytes())
                .map_err(|e| CodegenError::io(path.as_path(), e)),
            None => Err(CodegenError::io(
                &self.root,
                std::io::Error::other("no class file is open"),
            )),
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.close_current()
    }
}

impl Drop for DirectorySink {
    fn drop(&mut self) {
        if let Err(err) = self.close_current() {
            tracing::error!("{err}");
        }
    }
}

/// A class rendered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClass {
    pub name: String,
    /// Path the class would get under an output directory.
    pub path: PathBuf,
    pub content: String,
}

/// Collects classes in memory, for previews and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    package: Option<String>,
    classes: Vec<GeneratedClass>,
}

impl MemorySink {
    pub fn new(package: Option<String>) -> Self {
        Self {
            package,
            classes: Vec::new(),
        }
    }

    pub fn classes(&self) -> &[GeneratedClass] {
        &self.classes
    }

    pub fn into_classes(self) -> Vec<GeneratedClass> {
        self.classes
    }

    pub fn get(&self, name: &str) -> Option<&GeneratedClass> {
        self.classes.iter().find(|c| c.name == name)
    }
}

impl ClassSink for MemorySink {
    fn begin(&mut self, class: &str) -> Result<()> {
        self.classes.push(GeneratedClass {
            name: class.to_string(),
            path: class_path(self.package.as_deref(), class),
            content: String::new(),
        });
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        if let Some(class) = self.classes.last_mut() {
            class.content.push_str(text);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

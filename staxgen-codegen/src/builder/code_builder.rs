//! Line buffer that tracks indentation for generated code.

use super::Indent;

/// Mutable builder for properly indented source text.
///
/// Block primitives keep the indent level consistent: [`open_block`]
/// writes its header at the current level and then indents, and
/// [`close_block`] dedents before writing the closing line. Callers are
/// responsible for pairing every open with exactly one close.
///
/// # Example
///
/// ```
/// use staxgen_codegen::builder::CodeBuilder;
///
/// let mut b = CodeBuilder::java();
/// b.open_block("class Foo {")
///     .push_line("int x;")
///     .close_block("}");
///
/// assert_eq!(b.build(), "class Foo {\n    int x;\n}\n");
/// ```
///
/// [`open_block`]: CodeBuilder::open_block
/// [`close_block`]: CodeBuilder::close_block
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Create a new CodeBuilder with 4-space indentation.
    pub fn java() -> Self {
        Self::new(Indent::JAVA)
    }

    /// Add a line of code with current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line (no indentation).
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Increase indentation level.
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Write `header` at the current level, then indent.
    pub fn open_block(&mut self, header: &str) -> &mut Self {
        self.push_line(header).push_indent()
    }

    /// Dedent, then write `close` at the restored level.
    pub fn close_block(&mut self, close: &str) -> &mut Self {
        self.push_dedent().push_line(close)
    }

    /// Close the current block and open a sibling on the same line,
    /// as in `} else {`.
    pub fn continue_block(&mut self, line: &str) -> &mut Self {
        self.push_dedent().push_line(line).push_indent()
    }

    /// Get the current indentation level.
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    /// Take the buffered text, leaving the builder empty at level zero.
    pub fn take(&mut self) -> String {
        self.indent_level = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Get a reference to the current buffer content.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::java()
    }
}

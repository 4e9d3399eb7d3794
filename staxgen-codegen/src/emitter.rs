//! Java emission backend.
//!
//! The [`Emitter`] owns the run's [`EmitOptions`], an indentation-aware
//! buffer for the class being generated and a borrowed [`ClassSink`]. Its
//! primitives render one construct each; block openers indent and
//! [`Emitter::end_block`] dedents, and the type compiler pairs them.

use crate::{
    builder::CodeBuilder,
    error::Result,
    naming::{capitalize, string_literal, uncapitalize},
    options::{AccessMode, EmitOptions, GenerationMode},
    sink::ClassSink,
};

/// Imports every generated class carries, whether or not it uses them.
pub const IMPORTS: &[&str] = &[
    "import java.util.ArrayList;",
    "import java.util.HashMap;",
    "import java.util.List;",
    "import java.util.Map;",
    "import javax.xml.stream.XMLStreamException;",
    "import javax.xml.stream.XMLStreamReader;",
    "import static javax.xml.stream.XMLStreamReader.START_ELEMENT;",
];

/// Name of the reader parameter in generated code.
pub(crate) const READER: &str = "xml";

/// Stateful text emitter for one run.
pub struct Emitter<'s> {
    options: EmitOptions,
    code: CodeBuilder,
    sink: &'s mut dyn ClassSink,
    /// Object the parse routine fills: `this` or a local instance.
    receiver: String,
}

impl<'s> Emitter<'s> {
    pub fn new(options: EmitOptions, sink: &'s mut dyn ClassSink) -> Self {
        let code = CodeBuilder::new(options.indent);
        Self {
            options,
            code,
            sink,
            receiver: "this".to_string(),
        }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Acquire the class's output and write everything up to the opening
    /// brace of the class body.
    pub fn start_class(&mut self, name: &str) -> Result<()> {
        self.sink.begin(name)?;
        self.receiver = "this".to_string();
        self.code.take();

        if let Some(package) = &self.options.package {
            self.code.push_line(&format!("package {package};")).push_blank();
        }
        for import in IMPORTS {
            self.code.push_line(import);
        }
        self.code.push_blank();
        self.code.open_block(&format!("public class {name} {{"));
        Ok(())
    }

    /// Close the class body, hand the text to the sink and release it.
    pub fn end_class(&mut self) -> Result<()> {
        self.end_block();
        let text = self.code.take();
        self.sink.write(&text)?;
        self.sink.finish()
    }

    pub fn blank(&mut self) {
        self.code.push_blank();
    }

    pub fn end_block(&mut self) {
        self.code.close_block("}");
    }

    // ---------------------------------------------------------------------
    // Storage slots
    // ---------------------------------------------------------------------

    fn declare(&mut self, java_type: &str, name: &str, init: Option<&str>) {
        let visibility = match self.options.access {
            AccessMode::Field => "",
            AccessMode::Accessor => "private ",
        };
        let line = match init {
            Some(init) => format!("{visibility}{java_type} {name} = {init};"),
            None => format!("{visibility}{java_type} {name};"),
        };
        self.code.push_line(&line);
    }

    pub fn field_string(&mut self, name: &str, default: Option<&str>) {
        let init = default.map(string_literal);
        self.declare("String", name, init.as_deref());
    }

    pub fn field_boolean(&mut self, name: &str, default: Option<bool>) {
        let init = default.map(|b| b.to_string());
        self.declare("boolean", name, init.as_deref());
    }

    pub fn field_record(&mut self, type_name: &str, name: &str) {
        self.declare(type_name, name, Some(&format!("new {type_name}()")));
    }

    pub fn field_list(&mut self, item_type: &str, name: &str) {
        self.declare(&format!("List<{item_type}>"), name, Some("new ArrayList<>()"));
    }

    pub fn field_map(&mut self, name: &str) {
        self.declare("Map<String, String>", name, Some("new HashMap<>()"));
    }

    /// `getX()` and `setX(value)` for one field, followed by a blank line.
    pub fn accessor_pair(&mut self, java_type: &str, name: &str) {
        let cap = capitalize(name);
        self.code
            .open_block(&format!("public {java_type} get{cap}() {{"))
            .push_line(&format!("return {name};"))
            .close_block("}")
            .push_blank()
            .open_block(&format!("public void set{cap}({java_type} {name}) {{"))
            .push_line(&format!("this.{name} = {name};"))
            .close_block("}")
            .push_blank();
    }

    // ---------------------------------------------------------------------
    // Parse routine structure
    // ---------------------------------------------------------------------

    /// The no-argument constructor plus the opening of the parse routine.
    /// In static mode this also declares the local instance.
    pub fn parse_routine(&mut self, type_name: &str) {
        self.code
            .push_line(&format!("public {type_name}() {{}}"))
            .push_blank();
        match self.options.generation {
            GenerationMode::Constructor => {
                self.code.open_block(&format!(
                    "public {type_name}(XMLStreamReader {READER}) throws XMLStreamException {{"
                ));
            }
            GenerationMode::StaticMethod => {
                let var = uncapitalize(type_name);
                self.code
                    .open_block(&format!(
                        "public static {type_name} parse{type_name}(XMLStreamReader {READER}) throws XMLStreamException {{"
                    ))
                    .push_line(&format!("{type_name} {var} = new {type_name}();"));
                self.receiver = var;
            }
        }
    }

    /// `return instance;` in static mode, nothing otherwise.
    pub fn return_instance(&mut self) {
        if self.options.generation == GenerationMode::StaticMethod {
            self.code.push_line(&format!("return {};", self.receiver));
        }
    }

    pub fn while_next_tag(&mut self) {
        self.code
            .open_block(&format!("while ({READER}.nextTag() == START_ELEMENT) {{"));
    }

    pub fn switch_on_tag_name(&mut self) {
        self.code
            .open_block(&format!("switch ({READER}.getLocalName()) {{"));
    }

    pub fn switch_case(&mut self, tag: &str) {
        self.code
            .open_block(&format!("case {}: {{", string_literal(tag)));
    }

    pub fn switch_break(&mut self) {
        self.code.push_line("break;");
    }

    /// The catch-all branch, complete with its closing brace.
    pub fn switch_default(&mut self) {
        self.code
            .open_block("default: {")
            .push_line(&format!(
                "throw new XMLStreamException(\"Unexpected tag: \" + {READER}.getLocalName(), {READER}.getLocation());"
            ))
            .close_block("}");
    }

    pub fn if_tag_name(&mut self, tag: &str) {
        self.code.open_block(&format!(
            "if ({READER}.getLocalName().equals({})) {{",
            string_literal(tag)
        ));
    }

    /// Turn an open `if` into `} else { throw ... }` and close it.
    pub fn else_expected(&mut self, tag: &str) {
        self.code
            .continue_block("} else {")
            .push_line(&format!(
                "throw new XMLStreamException(\"Expected <{tag}> but got: \" + {READER}.getLocalName(), {READER}.getLocation());"
            ))
            .close_block("}");
    }

    // ---------------------------------------------------------------------
    // Field reads and writes
    // ---------------------------------------------------------------------

    /// Expression reading `field` on the current receiver.
    pub fn read(&self, field: &str) -> String {
        match self.options.access {
            AccessMode::Field => format!("{}.{field}", self.receiver),
            AccessMode::Accessor => format!("{}.get{}()", self.receiver, capitalize(field)),
        }
    }

    /// Statement assigning `expr` to `field` on the current receiver.
    pub fn write(&self, field: &str, expr: &str) -> String {
        match self.options.access {
            AccessMode::Field => format!("{}.{field} = {expr};", self.receiver),
            AccessMode::Accessor => {
                format!("{}.set{}({expr});", self.receiver, capitalize(field))
            }
        }
    }

    /// Expression producing a parsed instance of `type_name` from the reader.
    fn parse_expr(&self, type_name: &str) -> String {
        match self.options.generation {
            GenerationMode::Constructor => format!("new {type_name}({READER})"),
            GenerationMode::StaticMethod => format!("{type_name}.parse{type_name}({READER})"),
        }
    }

    pub fn set_string(&mut self, field: &str) {
        let stmt = self.write(field, &format!("{READER}.getElementText()"));
        self.code.push_line(&stmt);
    }

    pub fn set_boolean(&mut self, field: &str) {
        let stmt = self.write(
            field,
            &format!("Boolean.parseBoolean({READER}.getElementText())"),
        );
        self.code.push_line(&stmt);
    }

    pub fn set_record(&mut self, field: &str, type_name: &str) {
        let stmt = self.write(field, &self.parse_expr(type_name));
        self.code.push_line(&stmt);
    }

    pub fn add_string(&mut self, list: &str) {
        let line = format!("{}.add({READER}.getElementText());", self.read(list));
        self.code.push_line(&line);
    }

    pub fn add_record(&mut self, list: &str, item_type: &str) {
        let line = format!("{}.add({});", self.read(list), self.parse_expr(item_type));
        self.code.push_line(&line);
    }

    pub fn put_string(&mut self, map: &str) {
        let line = format!(
            "{}.put({READER}.getLocalName(), {READER}.getElementText());",
            self.read(map)
        );
        self.code.push_line(&line);
    }

    /// Text of the class being built (for tests).
    #[cfg(test)]
    pub(crate) fn buffer(&self) -> &str {
        self.code.as_str()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.code.current_indent()
    }
}

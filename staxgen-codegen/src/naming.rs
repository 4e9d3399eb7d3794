//! Identifier and literal helpers for generated Java.

/// Upper-case the first character (e.g., "name" -> "Name").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Lower-case the first character (e.g., "Person" -> "person").
pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Java reserved words and literals, which cannot name anything.
pub(crate) const JAVA_KEYWORDS: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// Contextual keywords that cannot name a class.
const RESTRICTED_TYPE_NAMES: &[&str] = &["permits", "record", "sealed", "var", "yield"];

/// Simple type names every generated class already refers to.
pub(crate) const IMPORTED_NAMES: &[&str] = &[
    "ArrayList",
    "Boolean",
    "HashMap",
    "List",
    "Map",
    "Object",
    "String",
    "XMLStreamException",
    "XMLStreamReader",
];

pub fn is_java_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Check that `name` can be written as a Java identifier.
/// Returns None if valid, Some(reason) if invalid.
pub fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("name cannot be empty"),
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        Some(_) => return Some("name must start with a letter, underscore or dollar sign"),
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return Some("name may only contain letters, digits, underscores and dollar signs");
    }
    if is_java_keyword(name) {
        return Some("name is a Java reserved word");
    }
    None
}

/// Like [`validate_identifier`], with the extra rules for class names.
pub fn validate_type_name(name: &str) -> Option<&'static str> {
    if let Some(reason) = validate_identifier(name) {
        return Some(reason);
    }
    if RESTRICTED_TYPE_NAMES.contains(&name) {
        return Some("name is a restricted Java identifier");
    }
    if IMPORTED_NAMES.contains(&name) {
        return Some("name clashes with a type used by every generated class");
    }
    None
}

/// Render `s` as a double-quoted Java string literal.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

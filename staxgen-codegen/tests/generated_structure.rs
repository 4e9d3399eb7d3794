//! Structural properties of generated classes.

use staxgen_codegen::{
    AccessMode, DirectorySink, EmitOptions, GenerationMode, Generator, MemorySink, StreamSink,
    classify,
};
use staxgen_schema::{FieldDecl, RecordTypeDecl, Schema};

fn sample_schema() -> Schema {
    Schema::new(vec![
        RecordTypeDecl::new("Order")
            .field(FieldDecl::string("id"))
            .field(FieldDecl::string("note").with_default("say \"hi\""))
            .field(FieldDecl::boolean("paid").with_default("false"))
            .field(FieldDecl::nested("customer", "Customer"))
            .field(FieldDecl::list_of_records("lines", "line", "Line"))
            .field(FieldDecl::list_of_strings("labels", "label"))
            .field(FieldDecl::string_map("attrs")),
        RecordTypeDecl::new("Customer").field(FieldDecl::string("name")),
        RecordTypeDecl::new("Line")
            .field(FieldDecl::string("sku"))
            .field(FieldDecl::list_of_records("parts", "part", "Part")),
        RecordTypeDecl::new("Part").field(FieldDecl::string("code")),
    ])
}

fn all_modes() -> Vec<EmitOptions> {
    let mut out = Vec::new();
    for generation in [GenerationMode::Constructor, GenerationMode::StaticMethod] {
        for access in [AccessMode::Field, AccessMode::Accessor] {
            out.push(
                EmitOptions::new()
                    .with_generation(generation)
                    .with_access(access),
            );
        }
    }
    out
}

/// Lines declaring storage slots: statements directly in the class body.
fn slot_lines(class: &str) -> Vec<&str> {
    class
        .lines()
        .filter(|l| l.starts_with("    ") && !l.starts_with("     "))
        .map(str::trim)
        .filter(|l| l.ends_with(';'))
        .collect()
}

#[test]
fn test_one_slot_per_field_in_order() {
    let schema = sample_schema();
    for options in all_modes() {
        let classes = Generator::new(options).preview(&schema).unwrap();
        for (class, decl) in classes.iter().zip(&schema.types) {
            let slots = slot_lines(&class.content);
            assert_eq!(slots.len(), decl.fields.len(), "{}", class.content);
            for (slot, field) in slots.iter().zip(&decl.fields) {
                let declared = slot
                    .split(" = ")
                    .next()
                    .unwrap()
                    .trim_end_matches(';')
                    .rsplit(' ')
                    .next()
                    .unwrap();
                assert_eq!(declared, field.name);
            }
        }
    }
}

#[test]
fn test_blocks_are_balanced_and_indented() {
    let schema = sample_schema();
    for options in all_modes() {
        for class in Generator::new(options).preview(&schema).unwrap() {
            let mut depth = 0usize;
            for line in class.content.lines().filter(|l| !l.trim().is_empty()) {
                let trimmed = line.trim_start();
                let indent = line.len() - trimmed.len();
                if trimmed.starts_with('}') {
                    depth = depth.checked_sub(1).expect("unbalanced close");
                }
                assert_eq!(indent, depth * 4, "bad indent at {line:?}");
                let opens = trimmed.ends_with('{');
                if opens {
                    depth += 1;
                }
            }
            assert_eq!(depth, 0, "unclosed block in {}", class.name);
            assert!(class.content.ends_with("}\n"));
            assert!(!class.content.ends_with("}\n\n"));
        }
    }
}

#[test]
fn test_classification_is_deterministic() {
    for decl in &sample_schema().types {
        for field in &decl.fields {
            let first = classify(field);
            assert!(first.is_some(), "{} did not classify", field.name);
            assert_eq!(first, classify(field));
        }
    }
}

#[test]
fn test_mode_changes_only_routine_and_calls() {
    let schema = sample_schema();
    let ctor = Generator::new(EmitOptions::new()).preview(&schema).unwrap();
    let stat = Generator::new(EmitOptions::new().with_generation(GenerationMode::StaticMethod))
        .preview(&schema)
        .unwrap();

    let order_ctor = &ctor[0].content;
    let order_static = &stat[0].content;
    assert!(order_ctor.contains("public Order(XMLStreamReader xml) throws XMLStreamException {"));
    assert!(!order_ctor.contains("parseOrder"));
    assert!(order_ctor.contains("this.customer = new Customer(xml);"));
    assert!(order_static.contains("public static Order parseOrder(XMLStreamReader xml)"));
    assert!(order_static.contains("order.customer = Customer.parseCustomer(xml);"));
    assert!(order_static.contains("return order;"));

    // Field declarations are identical between the two modes.
    assert_eq!(slot_lines(order_ctor), slot_lines(order_static));
}

#[test]
fn test_nested_list_inner_loop() {
    let classes = Generator::default().preview(&sample_schema()).unwrap();
    let line = &classes[2].content;
    assert!(line.contains(
        "                case \"parts\": {\n\
         \x20                   while (xml.nextTag() == START_ELEMENT) {\n\
         \x20                       if (xml.getLocalName().equals(\"part\")) {\n\
         \x20                           this.parts.add(new Part(xml));\n\
         \x20                       } else {\n\
         \x20                           throw new XMLStreamException(\"Expected <part> but got: \" + xml.getLocalName(), xml.getLocation());\n\
         \x20                       }\n\
         \x20                   }\n\
         \x20                   break;\n\
         \x20               }\n"
    ));
}

#[test]
fn test_string_default_is_escaped() {
    let classes = Generator::default().preview(&sample_schema()).unwrap();
    assert!(classes[0].content.contains("    String note = \"say \\\"hi\\\"\";\n"));
    assert!(classes[0].content.contains("    boolean paid = false;\n"));
}

#[test]
fn test_zero_types_zero_classes() {
    let schema = staxgen_schema::parse_str(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
             <xs:element name="root" type="xs:string"/>
           </xs:schema>"#,
        "empty.xsd",
    )
    .unwrap();

    let mut sink = StreamSink::new(Vec::new(), "<buffer>");
    let result = Generator::default().generate(&schema, &mut sink).unwrap();
    assert!(result.classes.is_empty());
    assert!(sink.into_inner().is_empty());

    let temp = tempfile::TempDir::new().unwrap();
    let mut dir = DirectorySink::new(temp.path(), None);
    Generator::default().generate(&schema, &mut dir).unwrap();
    assert!(dir.created().is_empty());
}

#[test]
fn test_stream_output_concatenates_classes() {
    let mut sink = StreamSink::new(Vec::new(), "<buffer>");
    Generator::default()
        .generate(&sample_schema(), &mut sink)
        .unwrap();
    let out = String::from_utf8(sink.into_inner()).unwrap();

    let headers: Vec<_> = out
        .lines()
        .filter(|l| l.starts_with("public class "))
        .collect();
    assert_eq!(
        headers,
        [
            "public class Order {",
            "public class Customer {",
            "public class Line {",
            "public class Part {"
        ]
    );
    assert!(out.contains("}\n\nimport java.util.ArrayList;\n"));
}

#[test]
fn test_directory_output_nests_package() {
    let temp = tempfile::TempDir::new().unwrap();
    let mut sink = DirectorySink::new(temp.path(), Some("com.acme.orders".to_string()));
    Generator::new(EmitOptions::new().with_package("com.acme.orders"))
        .generate(&sample_schema(), &mut sink)
        .unwrap();
    drop(sink);

    let dir = temp.path().join("com/acme/orders");
    for name in ["Order", "Customer", "Line", "Part"] {
        let text = std::fs::read_to_string(dir.join(format!("{name}.java"))).unwrap();
        assert!(text.starts_with("package com.acme.orders;\n\nimport "));
        assert!(text.contains(&format!("public class {name} {{")));
    }
}

#[test]
fn test_failure_writes_nothing() {
    let mut schema = sample_schema();
    schema.types.push(RecordTypeDecl::new("Broken").field(FieldDecl::untyped("mystery")));

    let mut sink = MemorySink::default();
    let err = Generator::default().generate(&schema, &mut sink).unwrap_err();
    assert!(err.to_string().contains("mystery"));
    assert!(sink.classes().is_empty());
}

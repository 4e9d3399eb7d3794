//! Lowering of an XML Schema element tree into the [`Schema`] model.

use crate::{
    error::{Result, SourceContext},
    model::{FieldDecl, ItemType, RecordTypeDecl, RepeatedSpec, ScalarType, Schema},
    xml::{Node, parse_tree},
};

/// The XML Schema namespace.
pub const XS: &str = "http://www.w3.org/2001/XMLSchema";

/// Read a schema from source text.
pub(crate) fn read_schema(ctx: &SourceContext) -> Result<Schema> {
    let root = parse_tree(ctx)?;
    if !root.is(XS, "schema") {
        return Err(ctx.structure_error(
            format!("root element <{}> is not an XML Schema <schema>", root.raw_name),
            Some(root.span),
        ));
    }

    let mut types = Vec::new();
    for child in &root.children {
        if child.is(XS, "complexType") {
            types.push(read_complex_type(ctx, child)?);
        }
    }
    Ok(Schema::new(types))
}

fn read_complex_type(ctx: &SourceContext, node: &Node) -> Result<RecordTypeDecl> {
    let name = node
        .attr("name")
        .ok_or_else(|| ctx.unsupported("anonymous complexType", "schema", node.span))?;
    let context = format!("complex type '{name}'");

    let mut body = significant_children(node);
    let fields = match body.next() {
        None => Vec::new(),
        Some(group) if group.is(XS, "all") || group.is(XS, "sequence") => {
            read_particles(ctx, group, &context)?
        }
        Some(other) => {
            return Err(ctx.unsupported(format!("<{}>", other.raw_name), context, other.span));
        }
    };
    if let Some(extra) = body.next() {
        return Err(ctx.unsupported(format!("<{}>", extra.raw_name), context, extra.span));
    }

    Ok(RecordTypeDecl {
        name: name.to_string(),
        fields,
        span: Some(node.span),
    })
}

fn read_particles(ctx: &SourceContext, group: &Node, context: &str) -> Result<Vec<FieldDecl>> {
    significant_children(group)
        .map(|particle| {
            if particle.is(XS, "element") {
                read_field(ctx, particle, context)
            } else {
                Err(ctx.unsupported(format!("<{}>", particle.raw_name), context, particle.span))
            }
        })
        .collect()
}

fn read_field(ctx: &SourceContext, node: &Node, context: &str) -> Result<FieldDecl> {
    if node.attr("ref").is_some() {
        return Err(ctx.unsupported("element reference (ref=)", context, node.span));
    }
    let name = node
        .attr("name")
        .ok_or_else(|| ctx.unsupported("element without a name", context, node.span))?;
    let context = format!("field '{name}' of {context}");

    let mut field = FieldDecl::untyped(name);
    field.span = Some(node.span);
    field.default_value = node.attr("default").map(str::to_string);

    if let Some(qname) = &node.type_ref {
        match (qname.ns.as_deref(), qname.local.as_str()) {
            (Some(XS), "string") => field.scalar_type = Some(ScalarType::String),
            (Some(XS), "boolean") => field.scalar_type = Some(ScalarType::Boolean),
            (Some(XS), local) => {
                return Err(ctx.unsupported(
                    format!("built-in type xs:{local}"),
                    context,
                    node.span,
                ));
            }
            (_, local) => field.nested_type_name = Some(local.to_string()),
        }
        return Ok(field);
    }

    let Some(inline) = significant_children(node).find(|c| c.is(XS, "complexType")) else {
        return Ok(field);
    };
    let mut body = significant_children(inline);
    let sequence = match body.next() {
        None => return Ok(field),
        Some(group) if group.is(XS, "sequence") => group,
        Some(other) => {
            return Err(ctx.unsupported(format!("<{}>", other.raw_name), context, other.span));
        }
    };
    if let Some(extra) = body.next() {
        return Err(ctx.unsupported(format!("<{}>", extra.raw_name), context, extra.span));
    }

    let mut particles = significant_children(sequence);
    let first = particles
        .next()
        .ok_or_else(|| ctx.unsupported("empty repeated sequence", &context, sequence.span))?;
    if let Some(extra) = particles.next() {
        return Err(ctx.unsupported(
            format!("second particle <{}> in repeated sequence", extra.raw_name),
            context,
            extra.span,
        ));
    }

    if first.is(XS, "any") {
        field.repeated = Some(RepeatedSpec::Heterogeneous);
    } else if first.is(XS, "element") {
        field.repeated = Some(read_item(ctx, first, &context)?);
    } else {
        return Err(ctx.unsupported(format!("<{}>", first.raw_name), context, first.span));
    }
    Ok(field)
}

fn read_item(ctx: &SourceContext, node: &Node, context: &str) -> Result<RepeatedSpec> {
    let item_tag = node
        .attr("name")
        .ok_or_else(|| ctx.unsupported("repeated element without a name", context, node.span))?;
    let qname = node.type_ref.as_ref().ok_or_else(|| {
        ctx.unsupported("repeated element without a type (nested too deeply)", context, node.span)
    })?;
    let item_type = match (qname.ns.as_deref(), qname.local.as_str()) {
        (Some(XS), "string") => ItemType::String,
        (Some(XS), local) => {
            return Err(ctx.unsupported(
                format!("repeated built-in type xs:{local}"),
                context,
                node.span,
            ));
        }
        (_, local) => ItemType::Record(local.to_string()),
    };
    Ok(RepeatedSpec::Homogeneous {
        item_tag: item_tag.to_string(),
        item_type,
    })
}

/// Children other than `xs:annotation`.
fn significant_children(node: &Node) -> impl Iterator<Item = &Node> {
    node.children.iter().filter(|c| !c.is(XS, "annotation"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn read(src: &str) -> Result<Schema> {
        read_schema(&SourceContext::new(src, "test.xsd"))
    }

    fn wrap(body: &str) -> String {
        format!(r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">{body}</xs:schema>"#)
    }

    #[test]
    fn test_reads_every_field_shape() {
        let schema = read(&wrap(
            r#"
            <xs:complexType name="Person">
                <xs:all>
                    <xs:element name="name" type="xs:string"/>
                    <xs:element name="active" type="xs:boolean" default="true"/>
                    <xs:element name="home" type="Address"/>
                    <xs:element name="tags">
                        <xs:complexType>
                            <xs:sequence>
                                <xs:element name="tag" type="xs:string" maxOccurs="unbounded"/>
                            </xs:sequence>
                        </xs:complexType>
                    </xs:element>
                    <xs:element name="addresses">
                        <xs:complexType>
                            <xs:sequence>
                                <xs:element name="address" type="Address" maxOccurs="unbounded"/>
                            </xs:sequence>
                        </xs:complexType>
                    </xs:element>
                    <xs:element name="props">
                        <xs:complexType>
                            <xs:sequence>
                                <xs:any processContents="lax" maxOccurs="unbounded"/>
                            </xs:sequence>
                        </xs:complexType>
                    </xs:element>
                </xs:all>
            </xs:complexType>
            "#,
        ))
        .unwrap();

        assert_eq!(schema.types.len(), 1);
        let person = &schema.types[0];
        assert_eq!(person.name, "Person");
        let f = &person.fields;
        assert_eq!(f.len(), 6);
        assert_eq!(f[0].scalar_type, Some(ScalarType::String));
        assert_eq!(f[1].scalar_type, Some(ScalarType::Boolean));
        assert_eq!(f[1].default_value.as_deref(), Some("true"));
        assert_eq!(f[2].nested_type_name.as_deref(), Some("Address"));
        assert_eq!(
            f[3].repeated,
            Some(RepeatedSpec::Homogeneous {
                item_tag: "tag".into(),
                item_type: ItemType::String
            })
        );
        assert_eq!(
            f[4].repeated,
            Some(RepeatedSpec::Homogeneous {
                item_tag: "address".into(),
                item_type: ItemType::Record("Address".into())
            })
        );
        assert_eq!(f[5].repeated, Some(RepeatedSpec::Heterogeneous));
    }

    #[test]
    fn test_other_declarations_are_ignored() {
        let schema = read(&wrap(
            r#"
            <xs:annotation><xs:documentation>doc</xs:documentation></xs:annotation>
            <xs:simpleType name="Code"><xs:restriction base="xs:string"/></xs:simpleType>
            <xs:element name="root" type="A"/>
            <xs:complexType name="A"><xs:sequence/></xs:complexType>
            <xs:complexType name="B"/>
            "#,
        ))
        .unwrap();
        let names: Vec<_> = schema.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert!(schema.types.iter().all(|t| t.fields.is_empty()));
    }

    #[test]
    fn test_zero_complex_types() {
        let schema = read(&wrap("")).unwrap();
        assert!(schema.types.is_empty());
    }

    #[test]
    fn test_default_namespace_prefix() {
        let schema = read(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t">
                <complexType name="A"><sequence>
                    <element name="s" type="string"/>
                    <element name="b" type="t:B"/>
                </sequence></complexType>
            </schema>"#,
        )
        .unwrap();
        let fields = &schema.types[0].fields;
        assert_eq!(fields[0].scalar_type, Some(ScalarType::String));
        assert_eq!(fields[1].nested_type_name.as_deref(), Some("B"));
    }

    #[test]
    fn test_untyped_element_is_left_unclassified() {
        let schema = read(&wrap(
            r#"<xs:complexType name="A"><xs:all><xs:element name="x"/></xs:all></xs:complexType>"#,
        ))
        .unwrap();
        let field = &schema.types[0].fields[0];
        assert!(field.scalar_type.is_none());
        assert!(field.nested_type_name.is_none());
        assert!(field.repeated.is_none());
    }

    #[test]
    fn test_choice_is_unsupported() {
        let err = read(&wrap(
            r#"<xs:complexType name="A">
                <xs:choice><xs:element name="x" type="xs:string"/></xs:choice>
            </xs:complexType>"#,
        ))
        .unwrap_err();
        match *err {
            Error::UnsupportedConstruct { construct, context, .. } => {
                assert_eq!(construct, "<xs:choice>");
                assert_eq!(context, "complex type 'A'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_builtin_type_is_unsupported() {
        let err = read(&wrap(
            r#"<xs:complexType name="A">
                <xs:all><xs:element name="n" type="xs:int"/></xs:all>
            </xs:complexType>"#,
        ))
        .unwrap_err();
        assert!(matches!(*err, Error::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_deeper_nesting_is_unsupported() {
        let err = read(&wrap(
            r#"<xs:complexType name="A"><xs:all>
                <xs:element name="rows"><xs:complexType><xs:sequence>
                    <xs:element name="row">
                        <xs:complexType><xs:sequence/></xs:complexType>
                    </xs:element>
                </xs:sequence></xs:complexType></xs:element>
            </xs:all></xs:complexType>"#,
        ))
        .unwrap_err();
        assert!(matches!(*err, Error::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_two_particles_in_repeated_sequence_is_unsupported() {
        let err = read(&wrap(
            r#"<xs:complexType name="A"><xs:all>
                <xs:element name="rows"><xs:complexType><xs:sequence>
                    <xs:element name="a" type="xs:string"/>
                    <xs:element name="b" type="xs:string"/>
                </xs:sequence></xs:complexType></xs:element>
            </xs:all></xs:complexType>"#,
        ))
        .unwrap_err();
        assert!(matches!(*err, Error::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_attribute_beside_repeated_sequence_is_unsupported() {
        let err = read(&wrap(
            r#"<xs:complexType name="A"><xs:all>
                <xs:element name="rows"><xs:complexType>
                    <xs:sequence><xs:element name="row" type="xs:string"/></xs:sequence>
                    <xs:attribute name="count" type="xs:string"/>
                </xs:complexType></xs:element>
            </xs:all></xs:complexType>"#,
        ))
        .unwrap_err();
        match *err {
            Error::UnsupportedConstruct { construct, context, .. } => {
                assert_eq!(construct, "<xs:attribute>");
                assert_eq!(context, "field 'rows' of complex type 'A'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_inline_choice_is_unsupported() {
        let err = read(&wrap(
            r#"<xs:complexType name="A"><xs:all>
                <xs:element name="rows"><xs:complexType>
                    <xs:choice><xs:element name="row" type="xs:string"/></xs:choice>
                    <xs:sequence><xs:element name="row" type="xs:string"/></xs:sequence>
                </xs:complexType></xs:element>
            </xs:all></xs:complexType>"#,
        ))
        .unwrap_err();
        match *err {
            Error::UnsupportedConstruct { construct, .. } => assert_eq!(construct, "<xs:choice>"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_inline_type_is_left_unclassified() {
        let schema = read(&wrap(
            r#"<xs:complexType name="A"><xs:all>
                <xs:element name="x"><xs:complexType/></xs:element>
            </xs:all></xs:complexType>"#,
        ))
        .unwrap();
        assert!(schema.types[0].fields[0].repeated.is_none());
    }

    #[test]
    fn test_wrong_root() {
        let err = read("<root/>").unwrap_err();
        assert!(matches!(*err, Error::InvalidStructure { .. }));
    }

    #[test]
    fn test_malformed_xml() {
        let err = read("<xs:schema xmlns:xs=\"http://www.w3.org/2001/XMLSchema\">").unwrap_err();
        assert!(matches!(*err, Error::Xml { .. }));
    }
}

//! Minimal namespace-aware element tree built on `quick-xml`.
//!
//! Schema documents are small, so the reader materialises elements (no
//! text) into a tree and the XSD lowering walks it. Names are resolved by
//! [`NsReader`] while each element's bindings are in scope, including the
//! QName held by a `type` attribute.

use miette::SourceSpan;
use quick_xml::{
    NsReader,
    events::{BytesStart, Event},
    name::{QName as RawName, ResolveResult},
};

use crate::error::{Result, SourceContext};

/// A namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QName {
    pub ns: Option<String>,
    pub local: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Qualified name as written, for messages.
    pub raw_name: String,
    pub ns: Option<String>,
    pub local: String,
    pub attrs: Vec<(String, String)>,
    /// Resolved value of the `type` attribute.
    pub type_ref: Option<QName>,
    pub children: Vec<Node>,
    pub span: SourceSpan,
}

impl Node {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.ns.as_deref() == Some(ns) && self.local == local
    }
}

/// Namespace resolution detached from the reader borrow: `Err` holds an
/// undeclared prefix.
type Detached = std::result::Result<Option<Vec<u8>>, Vec<u8>>;

fn detach(resolved: ResolveResult<'_>) -> Detached {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(ns.as_ref().to_vec())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(prefix),
    }
}

fn utf8<'b>(ctx: &SourceContext, bytes: &'b [u8], offset: usize) -> Result<&'b str> {
    std::str::from_utf8(bytes).map_err(|err| ctx.xml_error(err.to_string(), offset))
}

fn qualify(
    ctx: &SourceContext,
    resolved: Detached,
    local: &[u8],
    what: &str,
    span: SourceSpan,
) -> Result<QName> {
    let ns = match resolved {
        Ok(ns) => ns
            .map(|ns| utf8(ctx, &ns, span.offset()).map(str::to_string))
            .transpose()?,
        Err(prefix) => {
            return Err(ctx.structure_error(
                format!(
                    "namespace prefix '{}' in {what} is not declared",
                    String::from_utf8_lossy(&prefix)
                ),
                Some(span),
            ));
        }
    };
    Ok(QName {
        ns,
        local: utf8(ctx, local, span.offset())?.to_string(),
    })
}

/// Parse the whole document into a tree and return its root element.
pub(crate) fn parse_tree(ctx: &SourceContext) -> Result<Node> {
    let src = ctx.src();
    let mut reader = NsReader::from_str(src);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let (resolved, event) = reader
            .read_resolved_event()
            .map(|(resolved, event)| (detach(resolved), event))
            .map_err(|e| ctx.xml_error(e.to_string(), reader.error_position() as usize))?;
        let end = reader.buffer_position() as usize;
        let span = trimmed_span(src, start, end);

        match event {
            Event::Start(e) => {
                stack.push(open_node(ctx, &reader, &e, resolved, span)?);
            }
            Event::Empty(e) => {
                let node = open_node(ctx, &reader, &e, resolved, span)?;
                attach(ctx, &mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| ctx.xml_error("unexpected closing tag", start))?;
                attach(ctx, &mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ctx.xml_error(
            format!("element <{}> is never closed", open.raw_name),
            src.len(),
        ));
    }
    root.ok_or_else(|| ctx.structure_error("document has no root element", None))
}

fn attach(
    ctx: &SourceContext,
    stack: &mut [Node],
    root: &mut Option<Node>,
    node: Node,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        Ok(())
    } else if root.is_none() {
        *root = Some(node);
        Ok(())
    } else {
        Err(ctx.structure_error("document has more than one root element", Some(node.span)))
    }
}

/// Build a node while the reader still has the element's bindings in scope.
fn open_node(
    ctx: &SourceContext,
    reader: &NsReader<&[u8]>,
    e: &BytesStart<'_>,
    resolved: Detached,
    span: SourceSpan,
) -> Result<Node> {
    let offset = span.offset();
    let raw_name = utf8(ctx, e.name().as_ref(), offset)?.to_string();
    let name = qualify(ctx, resolved, e.local_name().as_ref(), "element name", span)?;

    let mut attrs = Vec::new();
    let mut type_ref = None;
    for attr in e.attributes().flatten() {
        let key = utf8(ctx, attr.key.as_ref(), offset)?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let raw = utf8(ctx, &attr.value, offset)?;
        let value = quick_xml::escape::unescape(raw)
            .map_err(|err| ctx.xml_error(err.to_string(), offset))?
            .into_owned();

        if key == "type" {
            let (ns, local) = reader.resolve_element(RawName(value.as_bytes()));
            type_ref = Some(qualify(ctx, detach(ns), local.as_ref(), "type", span)?);
        }
        attrs.push((key.to_string(), value));
    }

    Ok(Node {
        raw_name,
        ns: name.ns,
        local: name.local,
        attrs,
        type_ref,
        children: Vec::new(),
        span,
    })
}

fn trimmed_span(src: &str, mut start: usize, end: usize) -> SourceSpan {
    let bytes = src.as_bytes();
    while start < end && bytes.get(start).is_some_and(u8::is_ascii_whitespace) {
        start += 1;
    }
    (start..end).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(src: &str) -> Result<Node> {
        parse_tree(&SourceContext::new(src, "test.xml"))
    }

    #[test]
    fn test_resolves_prefixed_and_default_namespaces() {
        let root = tree(
            r#"<a:root xmlns:a="urn:a" xmlns="urn:d"><child x="1"/><a:other/></a:root>"#,
        )
        .unwrap();
        assert!(root.is("urn:a", "root"));
        assert!(root.attrs.is_empty());
        assert_eq!(root.children.len(), 2);
        assert!(root.children[0].is("urn:d", "child"));
        assert_eq!(root.children[0].attr("x"), Some("1"));
        assert!(root.children[1].is("urn:a", "other"));
    }

    #[test]
    fn test_type_attribute_is_resolved_in_scope() {
        let root = tree(
            r#"<r xmlns:xs="urn:xs">
                <e type="xs:string"/>
                <f type="Local"/>
                <g xmlns:xs="urn:other" type="xs:string"/>
            </r>"#,
        )
        .unwrap();
        let qname = |i: usize| root.children[i].type_ref.clone().unwrap();
        assert_eq!(
            qname(0),
            QName {
                ns: Some("urn:xs".into()),
                local: "string".into()
            }
        );
        assert_eq!(
            qname(1),
            QName {
                ns: None,
                local: "Local".into()
            }
        );
        assert_eq!(qname(2).ns.as_deref(), Some("urn:other"));
        assert_eq!(root.children[0].attr("type"), Some("xs:string"));
    }

    #[test]
    fn test_type_attribute_uses_default_namespace() {
        let root = tree(r#"<r xmlns="urn:d"><e type="T"/></r>"#).unwrap();
        let qname = root.children[0].type_ref.clone().unwrap();
        assert_eq!(qname.ns.as_deref(), Some("urn:d"));
        assert_eq!(qname.local, "T");
    }

    #[test]
    fn test_undeclared_type_prefix_is_error() {
        assert!(tree(r#"<r><e type="nope:x"/></r>"#).is_err());
    }

    #[test]
    fn test_span_points_at_tag() {
        let src = "<r>\n  <e/>\n</r>";
        let root = tree(src).unwrap();
        let span = root.children[0].span;
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "<e/>");
    }

    #[test]
    fn test_undeclared_prefix_is_error() {
        assert!(tree("<x:r/>").is_err());
    }

    #[test]
    fn test_unclosed_element_is_error() {
        assert!(tree("<r><e></r>").is_err());
    }
}

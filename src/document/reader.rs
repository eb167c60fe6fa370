//! Project byte loading: gzip sniffing, text decoding and XML tree building.

use std::io::Read;

use flate2::read::GzDecoder;
use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::{Document, Node, NodeId};
use crate::error::{Error, Result};
use crate::util::{decode_text, xml_declared_encoding};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Parse raw project bytes.
///
/// Premiere projects are gzip-compressed XML. Plain XML is accepted too, and
/// any junk before the XML prolog (or before the first `<` when there is no
/// prolog) is skipped.
pub(crate) fn parse_bytes(bytes: &[u8]) -> Result<Document> {
    let inflated = gunzip(bytes);
    let xml_bytes = match inflated.as_deref() {
        Some(data) => data,
        None => skip_to_xml(bytes),
    };
    let text = decode_text(xml_bytes, xml_declared_encoding(xml_bytes));
    parse_str(&text)
}

/// Decompress gzip data, or `None` when the input is not (valid) gzip.
fn gunzip(bytes: &[u8]) -> Option<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return None;
    }
    let mut out = Vec::with_capacity(bytes.len() * 8);
    match GzDecoder::new(bytes).read_to_end(&mut out) {
        Ok(_) => {
            debug!("Inflated {} gzip bytes to {}", bytes.len(), out.len());
            Some(out)
        }
        Err(e) => {
            warn!("Input has a gzip header but failed to inflate ({e}); reading as plain XML");
            None
        }
    }
}

/// Slice from the XML prolog, or from the first `<` when there is none.
fn skip_to_xml(bytes: &[u8]) -> &[u8] {
    let start = memchr::memmem::find(bytes, b"<?xml").or_else(|| memchr::memchr(b'<', bytes));
    match start {
        Some(offset) => &bytes[offset..],
        None => bytes,
    }
}

/// Parse decoded XML text into a [`Document`].
pub(crate) fn parse_str(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);

    let mut nodes: Vec<Node> = Vec::new();
    // Open elements and the text collected for each so far.
    let mut open: Vec<(NodeId, String)> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let id = push_element(&mut nodes, &open, &e)?;
                open.push((id, String::new()));
            }
            Event::Empty(e) => {
                push_element(&mut nodes, &open, &e)?;
            }
            Event::End(_) => {
                let (id, text) = open
                    .pop()
                    .ok_or_else(|| Error::UnbalancedXml("unexpected closing tag".to_string()))?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    nodes[id.0 as usize].text = Some(trimmed.to_string());
                }
            }
            Event::Text(e) => {
                if let Some((_, buf)) = open.last_mut() {
                    buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if let Some((_, buf)) = open.last_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some((_, buf)) = open.last_mut() {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    match resolve_entity(&entity) {
                        Some(resolved) => buf.push_str(&resolved),
                        None => {
                            buf.push('&');
                            buf.push_str(&entity);
                            buf.push(';');
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some((id, _)) = open.last() {
        return Err(Error::UnbalancedXml(format!(
            "element <{}> is never closed",
            nodes[id.0 as usize].tag
        )));
    }
    if nodes.is_empty() {
        return Err(Error::EmptyDocument);
    }

    debug!("Parsed document with {} elements", nodes.len());
    Ok(Document::from_nodes(nodes))
}

/// Append an element to the arena and link it to the innermost open element.
fn push_element(nodes: &mut Vec<Node>, open: &[(NodeId, String)], e: &BytesStart) -> Result<NodeId> {
    let parent = open.last().map(|(id, _)| *id);
    if parent.is_none() && !nodes.is_empty() {
        return Err(Error::UnbalancedXml(
            "document has more than one root element".to_string(),
        ));
    }

    let name = e.name();
    let mut node = Node::new(String::from_utf8_lossy(local_name(name.as_ref())));
    node.parent = parent;
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = match unescape(&raw) {
            Ok(value) => value.into_owned(),
            Err(_) => raw.into_owned(),
        };
        node.attributes.push((key, value));
    }

    let id = NodeId(nodes.len() as u32);
    if let Some(parent) = parent {
        nodes[parent.0 as usize].children.push(id);
    }
    nodes.push(node);
    Ok(id)
}

/// Extract local name from namespaced XML name (e.g., "xsi:type" -> "type").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PremiereData Version="3">
    <Sequence ObjectUID="seq-1"><Name>Rock &amp; Roll</Name></Sequence>
</PremiereData>"#;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_parse_plain_xml() {
        let doc = parse_bytes(XML.as_bytes()).unwrap();
        assert_eq!(doc.tag(doc.root()), "PremiereData");
        let seq = doc.child(doc.root(), "Sequence").unwrap();
        assert_eq!(doc.child_text(seq, "Name"), Some("Rock & Roll"));
    }

    #[test]
    fn test_parse_gzip() {
        let doc = parse_bytes(&gzip(XML.as_bytes())).unwrap();
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_junk_before_prolog_is_skipped() {
        let mut bytes = b"\x00\x01garbage".to_vec();
        bytes.extend_from_slice(XML.as_bytes());
        let doc = parse_bytes(&bytes).unwrap();
        assert_eq!(doc.tag(doc.root()), "PremiereData");
    }

    #[test]
    fn test_junk_without_prolog_is_skipped() {
        let doc = parse_bytes(b"junk<Root><A/></Root>").unwrap();
        assert_eq!(doc.tag(doc.root()), "Root");
    }

    #[test]
    fn test_corrupt_gzip_falls_back_to_plain_xml() {
        let mut bytes = GZIP_MAGIC.to_vec();
        bytes.extend_from_slice(b"<Root/>");
        let doc = parse_bytes(&bytes).unwrap();
        assert_eq!(doc.tag(doc.root()), "Root");
    }

    #[test]
    fn test_attributes_are_unescaped_and_prefixes_stripped() {
        let doc = parse_str(r#"<p:Root Name="A &amp; B"><p:Child/></p:Root>"#).unwrap();
        assert_eq!(doc.tag(doc.root()), "Root");
        assert_eq!(doc.attr(doc.root(), "Name"), Some("A & B"));
        assert!(doc.child(doc.root(), "Child").is_some());
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let doc = parse_str("<Root>\n   <A> x </A>\n</Root>").unwrap();
        assert_eq!(doc.text(doc.root()), None);
        assert_eq!(doc.child_text(doc.root(), "A"), Some("x"));
    }

    #[test]
    fn test_cdata_text() {
        let doc = parse_str("<Root><![CDATA[a < b]]></Root>").unwrap();
        assert_eq!(doc.text(doc.root()), Some("a < b"));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(parse_str(""), Err(Error::EmptyDocument)));
        assert!(matches!(parse_bytes(b"no markup"), Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_unclosed_element() {
        assert!(parse_str("<Root><A>").is_err());
    }

    #[test]
    fn test_multiple_roots() {
        assert!(matches!(parse_str("<A/><B/>"), Err(Error::UnbalancedXml(_))));
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), Some("&".to_string()));
        assert_eq!(resolve_entity("#65"), Some("A".to_string()));
        assert_eq!(resolve_entity("#x2019"), Some("\u{2019}".to_string()));
        assert_eq!(resolve_entity("nbsp"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"Name"), b"Name");
        assert_eq!(local_name(b"xsi:type"), b"type");
    }
}

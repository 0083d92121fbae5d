// OPS envelope parsing.
//
// Streams the response with quick-xml and rebuilds the `data_block` as an
// `OpsValue` tree. Nesting depth is unbounded; unknown elements are skipped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::Error;
use crate::xml::OpsValue;

type ParseResult<T> = Result<T, String>;

/// Parse the `data_block` of an OPS envelope.
pub fn parse_data_block(xml: &str) -> Result<OpsValue, Error> {
    read_document(xml).map_err(|message| Error::Parse {
        message,
        body: xml.to_owned(),
    })
}

fn read_document(xml: &str) -> ParseResult<OpsValue> {
    // Text is not trimmed: scalar content such as TXT data is significant.
    let mut reader = Reader::from_str(xml);

    loop {
        match next(&mut reader)? {
            Event::Start(e) if e.name().as_ref() == b"data_block" => {
                return read_data_block(&mut reader);
            }
            Event::Empty(e) if e.name().as_ref() == b"data_block" => {
                return Ok(OpsValue::assoc());
            }
            Event::Eof => return Err("response has no data_block".into()),
            _ => {}
        }
    }
}

fn read_data_block(reader: &mut Reader<&[u8]>) -> ParseResult<OpsValue> {
    let mut value = None;
    loop {
        match next(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"dt_assoc" => value = Some(read_assoc(reader)?),
                b"dt_array" => value = Some(read_array(reader)?),
                _ => skip_element(reader)?,
            },
            Event::End(e) if e.name().as_ref() == b"data_block" => {
                return Ok(value.unwrap_or_else(OpsValue::assoc));
            }
            Event::Eof => return Err("unexpected end of document inside data_block".into()),
            _ => {}
        }
    }
}

fn read_assoc(reader: &mut Reader<&[u8]>) -> ParseResult<OpsValue> {
    let mut map = indexmap::IndexMap::new();
    loop {
        match next(reader)? {
            Event::Start(e) if e.name().as_ref() == b"item" => {
                let key = item_key(&e)?;
                let value = read_item(reader)?;
                map.insert(key, value);
            }
            Event::Empty(e) if e.name().as_ref() == b"item" => {
                map.insert(item_key(&e)?, OpsValue::Scalar(String::new()));
            }
            Event::Start(_) => skip_element(reader)?,
            Event::End(e) if e.name().as_ref() == b"dt_assoc" => return Ok(OpsValue::Assoc(map)),
            Event::Eof => return Err("unexpected end of document inside dt_assoc".into()),
            _ => {}
        }
    }
}

fn read_array(reader: &mut Reader<&[u8]>) -> ParseResult<OpsValue> {
    let mut items: Vec<(usize, OpsValue)> = Vec::new();
    loop {
        match next(reader)? {
            Event::Start(e) if e.name().as_ref() == b"item" => {
                let index = array_index(&e, items.len())?;
                items.push((index, read_item(reader)?));
            }
            Event::Empty(e) if e.name().as_ref() == b"item" => {
                let index = array_index(&e, items.len())?;
                items.push((index, OpsValue::Scalar(String::new())));
            }
            Event::Start(_) => skip_element(reader)?,
            Event::End(e) if e.name().as_ref() == b"dt_array" => {
                items.sort_by_key(|(index, _)| *index);
                return Ok(OpsValue::Array(items.into_iter().map(|(_, v)| v).collect()));
            }
            Event::Eof => return Err("unexpected end of document inside dt_array".into()),
            _ => {}
        }
    }
}

/// Content of an `<item>` whose start tag was already consumed.
fn read_item(reader: &mut Reader<&[u8]>) -> ParseResult<OpsValue> {
    let mut text = String::new();
    let mut nested = None;
    loop {
        match next(reader)? {
            Event::Text(t) => {
                let chunk = t.unescape().map_err(|e| format!("bad text in item: {e}"))?;
                text.push_str(&chunk);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::Start(e) => match e.name().as_ref() {
                b"dt_assoc" => nested = Some(read_assoc(reader)?),
                b"dt_array" => nested = Some(read_array(reader)?),
                b"dt_scalar" => nested = Some(OpsValue::Scalar(read_scalar(reader)?)),
                _ => skip_element(reader)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"dt_assoc" => nested = Some(OpsValue::assoc()),
                b"dt_array" => nested = Some(OpsValue::Array(Vec::new())),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"item" => {
                return Ok(nested.unwrap_or(OpsValue::Scalar(text)));
            }
            Event::Eof => return Err("unexpected end of document inside item".into()),
            _ => {}
        }
    }
}

fn read_scalar(reader: &mut Reader<&[u8]>) -> ParseResult<String> {
    let mut text = String::new();
    loop {
        match next(reader)? {
            Event::Text(t) => {
                let chunk = t.unescape().map_err(|e| format!("bad text in dt_scalar: {e}"))?;
                text.push_str(&chunk);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::End(_) => return Ok(text),
            Event::Eof => return Err("unexpected end of document inside dt_scalar".into()),
            _ => {}
        }
    }
}

/// Consume everything up to the end tag matching an already-read start tag.
fn skip_element(reader: &mut Reader<&[u8]>) -> ParseResult<()> {
    let mut depth = 1_usize;
    while depth > 0 {
        match next(reader)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err("unexpected end of document".into()),
            _ => {}
        }
    }
    Ok(())
}

fn item_key(start: &BytesStart<'_>) -> ParseResult<String> {
    let attr = start
        .try_get_attribute("key")
        .map_err(|e| format!("bad item attribute: {e}"))?
        .ok_or_else(|| "item without key attribute".to_owned())?;
    attr.unescape_value()
        .map(|v| v.into_owned())
        .map_err(|e| format!("bad item key: {e}"))
}

fn array_index(start: &BytesStart<'_>, fallback: usize) -> ParseResult<usize> {
    Ok(item_key(start)?.trim().parse().unwrap_or(fallback))
}

fn next<'a>(reader: &mut Reader<&'a [u8]>) -> ParseResult<Event<'a>> {
    reader
        .read_event()
        .map_err(|e| format!("malformed XML at byte {}: {e}", reader.buffer_position()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NESTED: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no' ?>
<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>
<OPS_envelope>
 <header><version>0.9</version></header>
 <body>
  <data_block>
   <dt_assoc>
    <item key="response_text">Command &amp; control</item>
    <item key="attributes">
     <dt_assoc>
      <item key="records">
       <dt_assoc>
        <item key="A">
         <dt_array>
          <item key="1"><dt_assoc><item key="subdomain">www</item></dt_assoc></item>
          <item key="0"><dt_assoc><item key="subdomain"/></dt_assoc></item>
         </dt_array>
        </item>
       </dt_assoc>
      </item>
      <item key="empty"><dt_array/></item>
     </dt_assoc>
    </item>
   </dt_assoc>
  </data_block>
 </body>
</OPS_envelope>"#;

    #[test]
    fn parses_nested_structures() {
        let v = parse_data_block(NESTED).unwrap();
        assert_eq!(v.get_str("response_text"), Some("Command & control"));
        let a = v.path(&["attributes", "records"]).unwrap().items("A");
        assert_eq!(a.len(), 2);
        // Sorted by index, not by document order.
        assert_eq!(a[0].get("subdomain").and_then(OpsValue::as_str), Some(""));
        assert_eq!(a[1].get_str("subdomain"), Some("www"));
        assert!(v.path(&["attributes"]).unwrap().items("empty").is_empty());
    }

    #[test]
    fn scalar_whitespace_is_preserved() {
        let xml = "<OPS_envelope><body><data_block><dt_assoc>\
                   <item key=\"text\">  padded value </item>\
                   <item key=\"nested\">\n  <dt_assoc><item key=\"k\">v</item></dt_assoc>\n</item>\
                   </dt_assoc></data_block></body></OPS_envelope>";
        let v = parse_data_block(xml).unwrap();
        assert_eq!(v.get("text").and_then(OpsValue::as_str), Some("  padded value "));
        assert_eq!(v.get_raw("text"), Some("  padded value "));
        assert_eq!(v.get_str("text"), Some("padded value"));
        assert_eq!(v.path(&["nested"]).unwrap().get_str("k"), Some("v"));
    }

    #[test]
    fn missing_data_block_is_a_parse_error() {
        let err = parse_data_block("<OPS_envelope><body/></OPS_envelope>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn truncated_document_is_a_parse_error() {
        let err = parse_data_block("<OPS_envelope><body><data_block><dt_assoc><item key=\"a\">")
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}

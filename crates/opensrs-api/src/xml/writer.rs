// OPS envelope serialization.
//
// Emits the `OPS_envelope` document without insignificant whitespace.
// Maps become `<dt_assoc>`, lists become `<dt_array>` keyed "0", "1", ...

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Error;
use crate::xml::OpsValue;

const PROTOCOL_VERSION: &str = "0.9";

/// Serialize `data_block` content into a complete OPS envelope.
pub fn write_envelope(data_block: &OpsValue) -> Result<String, Error> {
    let mut writer = Writer::new(Vec::new());

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))),
    )?;
    emit(
        &mut writer,
        Event::DocType(BytesText::from_escaped("OPS_envelope SYSTEM 'ops.dtd'")),
    )?;

    open(&mut writer, "OPS_envelope")?;
    open(&mut writer, "header")?;
    open(&mut writer, "version")?;
    emit(&mut writer, Event::Text(BytesText::new(PROTOCOL_VERSION)))?;
    close(&mut writer, "version")?;
    close(&mut writer, "header")?;
    open(&mut writer, "body")?;
    open(&mut writer, "data_block")?;
    write_value(&mut writer, data_block)?;
    close(&mut writer, "data_block")?;
    close(&mut writer, "body")?;
    close(&mut writer, "OPS_envelope")?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Encoding(e.to_string()))
}

fn write_value(writer: &mut Writer<Vec<u8>>, value: &OpsValue) -> Result<(), Error> {
    match value {
        OpsValue::Scalar(text) => {
            if !text.is_empty() {
                emit(writer, Event::Text(BytesText::new(text)))?;
            }
        }
        OpsValue::Assoc(map) => {
            open(writer, "dt_assoc")?;
            for (key, child) in map {
                write_item(writer, key, child)?;
            }
            close(writer, "dt_assoc")?;
        }
        OpsValue::Array(items) => {
            open(writer, "dt_array")?;
            for (index, child) in items.iter().enumerate() {
                write_item(writer, &index.to_string(), child)?;
            }
            close(writer, "dt_array")?;
        }
    }
    Ok(())
}

fn write_item(writer: &mut Writer<Vec<u8>>, key: &str, value: &OpsValue) -> Result<(), Error> {
    let mut start = BytesStart::new("item");
    start.push_attribute(("key", key));
    emit(writer, Event::Start(start))?;
    write_value(writer, value)?;
    close(writer, "item")
}

fn open(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), Error> {
    emit(writer, Event::Start(BytesStart::new(name)))
}

fn close(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), Error> {
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), Error> {
    writer
        .write_event(event)
        .map_err(|e| Error::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Assoc;

    #[test]
    fn envelope_has_header_and_data_block() {
        let xml = write_envelope(&Assoc::new().item("action", "LOOKUP").build()).unwrap_or_default();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"));
        assert!(xml.contains("<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>"));
        assert!(xml.contains("<header><version>0.9</version></header>"));
        assert!(xml.contains(
            "<data_block><dt_assoc><item key=\"action\">LOOKUP</item></dt_assoc></data_block>"
        ));
    }

    #[test]
    fn arrays_use_zero_based_keys() {
        let v = Assoc::new()
            .item("tlds", vec![OpsValue::from(".com"), OpsValue::from(".net")])
            .build();
        let xml = write_envelope(&v).unwrap_or_default();
        assert!(xml.contains(
            "<item key=\"tlds\"><dt_array><item key=\"0\">.com</item><item key=\"1\">.net</item></dt_array></item>"
        ));
    }

    #[test]
    fn text_is_escaped() {
        let v = Assoc::new().item("text", "v=spf1 <a> & \"b\"").build();
        let xml = write_envelope(&v).unwrap_or_default();
        assert!(xml.contains("&lt;a&gt; &amp;"));
        assert!(!xml.contains("<a>"));
    }
}

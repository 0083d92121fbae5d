// OPS request envelope
//
// A request is `protocol` + `action` + `object`, optional top-level items
// (e.g. `domain` for GET DOMAIN) and an `attributes` assoc.

use indexmap::IndexMap;

use crate::error::Error;
use crate::xml::{self, OpsValue};

const PROTOCOL: &str = "XCP";

/// A single OPS command, ready to be serialized and signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpsRequest {
    pub action: String,
    pub object: String,
    pub top_level: IndexMap<String, OpsValue>,
    pub attributes: OpsValue,
}

impl OpsRequest {
    pub fn new(action: &str, object: &str) -> Self {
        Self {
            action: action.to_owned(),
            object: object.to_owned(),
            top_level: IndexMap::new(),
            attributes: OpsValue::assoc(),
        }
    }

    #[must_use]
    pub fn attributes(mut self, attributes: impl Into<OpsValue>) -> Self {
        self.attributes = attributes.into();
        self
    }

    /// Add an item next to `action`/`object` rather than inside `attributes`.
    #[must_use]
    pub fn top_level(mut self, key: &str, value: impl Into<OpsValue>) -> Self {
        self.top_level.insert(key.to_owned(), value.into());
        self
    }

    /// The `data_block` tree for this request.
    pub fn to_data_block(&self) -> OpsValue {
        let mut block = IndexMap::new();
        block.insert("protocol".to_owned(), OpsValue::from(PROTOCOL));
        block.insert("action".to_owned(), OpsValue::from(self.action.as_str()));
        block.insert("object".to_owned(), OpsValue::from(self.object.as_str()));
        for (key, value) in &self.top_level {
            block.insert(key.clone(), value.clone());
        }
        block.insert("attributes".to_owned(), self.attributes.clone());
        OpsValue::Assoc(block)
    }

    /// Serialize to a complete OPS envelope.
    pub fn to_xml(&self) -> Result<String, Error> {
        xml::write_envelope(&self.to_data_block())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Assoc;

    #[test]
    fn data_block_order() {
        let req = OpsRequest::new("GET", "DOMAIN")
            .top_level("domain", "example.com")
            .attributes(Assoc::new().item("type", "all_info"));
        let xml = req.to_xml().unwrap_or_default();
        assert!(xml.contains(
            "<dt_assoc><item key=\"protocol\">XCP</item><item key=\"action\">GET</item>\
             <item key=\"object\">DOMAIN</item><item key=\"domain\">example.com</item>\
             <item key=\"attributes\"><dt_assoc><item key=\"type\">all_info</item></dt_assoc></item>"
        ));
    }
}

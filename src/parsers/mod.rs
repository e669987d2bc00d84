// Response parsing
// Responses are read into a generic keyed tree first; each operation's parser
// then pulls typed values out of that tree.
use indexmap::IndexMap;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{Result, UpsError};

pub mod address_validation;
pub mod quantum_view;
pub mod rates;
pub mod ship_accept;
pub mod ship_confirm;

pub use address_validation::{AddressClassification, AddressValidationParser};
pub use quantum_view::{QuantumViewParser, SubscriptionEvent, SubscriptionFile};
pub use rates::{RatedShipment, RatesParser};
pub use ship_accept::ShipAcceptParser;
pub use ship_confirm::ShipConfirmParser;

// A node of a parsed response.
// Sibling elements sharing a tag collapse into a `Sequence` in document
// order. An element seen once is stored bare, so readers of repeatable
// fields should go through `Value::items` or `Value::list_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Mapping(IndexMap<String, Value>),
    Sequence(Vec<Value>),
}

impl Value {
    // Child value by tag. Reading through a `Sequence` uses its first item.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(map) => map.get(key),
            Value::Sequence(items) => items.first().and_then(|v| v.get(key)),
            Value::Scalar(_) => None,
        }
    }

    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().try_fold(self, |value, key| value.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(text) => Some(text),
            Value::Sequence(items) => items.first().and_then(Value::as_str),
            Value::Mapping(_) => None,
        }
    }

    pub fn text_at(&self, keys: &[&str]) -> Option<&str> {
        self.path(keys).and_then(Value::as_str)
    }

    // This value as an ordered list: the items of a `Sequence`, otherwise a
    // single-element list.
    pub fn items(&self) -> Vec<&Value> {
        match self {
            Value::Sequence(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    // Empty when the path is absent
    pub fn list_at(&self, keys: &[&str]) -> Vec<&Value> {
        self.path(keys).map(Value::items).unwrap_or_default()
    }

    fn insert(map: &mut IndexMap<String, Value>, key: String, value: Value) {
        match map.get_mut(&key) {
            Some(Value::Sequence(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Value::Sequence(Vec::new()));
                *existing = Value::Sequence(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(text) => serializer.serialize_str(text),
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Value::Sequence(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
        }
    }
}

// An element still open while reading
struct Frame {
    tag: String,
    children: IndexMap<String, Value>,
    text: String,
}

impl Frame {
    fn new(tag: String) -> Self {
        Self {
            tag,
            children: IndexMap::new(),
            text: String::new(),
        }
    }

    fn finish(self) -> (String, Value) {
        if self.children.is_empty() {
            (self.tag, Value::Scalar(self.text))
        } else {
            (self.tag, Value::Mapping(self.children))
        }
    }
}

fn malformed(message: impl Into<String>) -> UpsError {
    UpsError::MalformedResponse(message.into())
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| malformed(format!("invalid UTF-8: {}", e)))
}

fn open_frame(stack: &mut [Frame]) -> Result<&mut Frame> {
    stack
        .last_mut()
        .ok_or_else(|| malformed("closing tag without matching opening tag"))
}

fn parse_elements(bytes: &[u8]) -> Result<IndexMap<String, Value>> {
    let mut reader = Reader::from_str(utf8(bytes)?);
    // Bottom frame collects the top-level elements
    let mut stack = vec![Frame::new(String::new())];

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(Frame::new(utf8(e.local_name().as_ref())?.to_string()));
            }
            Ok(Event::Empty(e)) => {
                let tag = utf8(e.local_name().as_ref())?.to_string();
                let parent = open_frame(&mut stack)?;
                Value::insert(&mut parent.children, tag, Value::Scalar(String::new()));
            }
            Ok(Event::End(_)) => {
                // The bottom frame is never closed by a tag
                if stack.len() < 2 {
                    return Err(malformed("closing tag without matching opening tag"));
                }
                if let Some(frame) = stack.pop() {
                    let (tag, value) = frame.finish();
                    let parent = open_frame(&mut stack)?;
                    Value::insert(&mut parent.children, tag, value);
                }
            }
            Ok(Event::Text(e)) => {
                let text = unescape(utf8(&e)?).map_err(|e| malformed(e.to_string()))?;
                open_frame(&mut stack)?.text.push_str(&text);
            }
            Ok(Event::GeneralRef(e)) => {
                let reference = format!("&{};", utf8(&e)?);
                let text = unescape(&reference).map_err(|e| malformed(e.to_string()))?;
                open_frame(&mut stack)?.text.push_str(&text);
            }
            Ok(Event::CData(e)) => {
                let text = utf8(&e)?.to_string();
                open_frame(&mut stack)?.text.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(malformed(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => (), // declarations, comments and processing instructions carry no data
        }
    }

    if stack.len() != 1 {
        return Err(malformed("unexpected end of document inside an element"));
    }
    let document = stack.pop().map(|frame| frame.children).unwrap_or_default();
    if document.is_empty() {
        return Err(malformed("document contains no elements"));
    }
    Ok(document)
}

// Parses XML bytes into a mapping of top-level tags to their values.
pub fn parse_document(bytes: &[u8]) -> Result<Value> {
    parse_elements(bytes).map(Value::Mapping)
}

// A monetary amount as reported by the carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Charge {
    pub currency_code: String,
    pub monetary_value: String,
}

impl Charge {
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            currency_code: value.text_at(&["CurrencyCode"]).unwrap_or_default().to_string(),
            monetary_value: value.text_at(&["MonetaryValue"])?.to_string(),
        })
    }

    pub fn amount(&self) -> Option<f64> {
        self.monetary_value.trim().parse().ok()
    }
}

// One `Response/Error` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CarrierError {
    pub severity: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

// The parsed response common to every operation.
// Every carrier response has a single root element holding a `Response`
// element with the status code and description.
#[derive(Debug, Clone)]
pub struct Envelope {
    root_tag: String,
    root: Value,
    // Set for every response whose status code is not "1"
    failure: Option<String>,
}

impl Envelope {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let elements = parse_elements(bytes)?;
        if elements.len() != 1 {
            return Err(malformed(format!(
                "expected a single root element, found {}",
                elements.len()
            )));
        }
        let (root_tag, root) = elements
            .into_iter()
            .next()
            .ok_or_else(|| malformed("document contains no elements"))?;

        let has_response = matches!(root, Value::Mapping(_))
            && matches!(root.get("Response"), Some(Value::Mapping(_)));
        if !has_response {
            return Err(malformed(format!("{} has no Response element", root_tag)));
        }
        let status_code = root
            .text_at(&["Response", "ResponseStatusCode"])
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| malformed(format!("{} has no ResponseStatusCode", root_tag)))?;

        let failure = if status_code == "1" {
            None
        } else {
            let described = [
                &["Response", "Error", "ErrorDescription"][..],
                &["Response", "ResponseStatusDescription"][..],
            ]
            .iter()
            .filter_map(|path| root.text_at(path))
            .map(str::trim)
            .find(|text| !text.is_empty());
            Some(match described {
                Some(text) => text.to_string(),
                None => format!("response status code {}", status_code),
            })
        };

        Ok(Self {
            root_tag,
            root,
            failure,
        })
    }

    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn status_code(&self) -> Option<&str> {
        self.root.text_at(&["Response", "ResponseStatusCode"])
    }

    pub fn status_description(&self) -> Option<&str> {
        self.root.text_at(&["Response", "ResponseStatusDescription"])
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn errors(&self) -> Vec<CarrierError> {
        self.root
            .list_at(&["Response", "Error"])
            .into_iter()
            .map(|error| CarrierError {
                severity: error.text_at(&["ErrorSeverity"]).map(str::to_string),
                code: error.text_at(&["ErrorCode"]).map(str::to_string),
                description: error.text_at(&["ErrorDescription"]).map(str::to_string),
            })
            .collect()
    }

    // First non-blank of Error/ErrorDescription, ResponseStatusDescription or the
    // status code; `None` only when the response succeeded
    pub fn error_description(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn to_json(&self) -> Result<String> {
        let root = serde_json::to_value(&self.root)
            .map_err(|e| UpsError::Serialization(e.to_string()))?;
        let mut document = serde_json::Map::new();
        document.insert(self.root_tag.clone(), root);
        serde_json::to_string(&serde_json::Value::Object(document))
            .map_err(|e| UpsError::Serialization(e.to_string()))
    }
}

// Typed view over one operation's response.
pub trait ResponseParser: Sized {
    fn from_envelope(envelope: Envelope) -> Self;

    fn envelope(&self) -> &Envelope;

    fn parse(bytes: &[u8]) -> Result<Self> {
        Envelope::parse(bytes).map(Self::from_envelope)
    }

    fn is_success(&self) -> bool {
        self.envelope().is_success()
    }

    fn error_description(&self) -> Option<&str> {
        self.envelope().error_description()
    }

    fn errors(&self) -> Vec<CarrierError> {
        self.envelope().errors()
    }
}

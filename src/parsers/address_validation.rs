use serde::Serialize;

use super::{Envelope, ResponseParser, Value};
use crate::builders::Address;

// How the carrier classified the submitted address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddressClassification {
    Valid,
    Ambiguous,
    NoCandidates,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct AddressValidationParser {
    envelope: Envelope,
}

impl AddressValidationParser {
    pub fn classification(&self) -> AddressClassification {
        let root = self.envelope.root();
        if root.get("ValidAddressIndicator").is_some() {
            AddressClassification::Valid
        } else if root.get("AmbiguousAddressIndicator").is_some() {
            AddressClassification::Ambiguous
        } else if root.get("NoCandidatesIndicator").is_some() {
            AddressClassification::NoCandidates
        } else {
            AddressClassification::Unknown
        }
    }

    pub fn candidates(&self) -> Vec<Address> {
        self.envelope
            .root()
            .list_at(&["AddressKeyFormat"])
            .into_iter()
            .map(candidate)
            .collect()
    }
}

fn candidate(value: &Value) -> Address {
    let text = |key: &str| value.text_at(&[key]).unwrap_or_default().to_string();
    Address {
        address_lines: value
            .list_at(&["AddressLine"])
            .into_iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        city: text("PoliticalDivision2"),
        state: value.text_at(&["PoliticalDivision1"]).map(str::to_string),
        postal_code: text("PostcodePrimaryLow"),
        country_code: text("CountryCode"),
    }
}

impl ResponseParser for AddressValidationParser {
    fn from_envelope(envelope: Envelope) -> Self {
        Self { envelope }
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

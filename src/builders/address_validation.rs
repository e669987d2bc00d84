use super::{Address, Credentials, RequestBuilder, RequestDocument};
use crate::connection::Operation;
use crate::parsers::AddressValidationParser;

// Builds a street-level AddressValidationRequest (XAV).
#[derive(Debug, Clone)]
pub struct AddressValidationBuilder {
    document: RequestDocument,
}

impl AddressValidationBuilder {
    pub fn new(credentials: &Credentials) -> Self {
        let mut document = RequestDocument::new("AddressValidationRequest", credentials);
        // Option 3: validation plus classification
        document.add_request("XAV", Some("3"));
        Self { document }
    }

    pub fn add_address(&mut self, address: &Address) {
        self.document.append_node(&[], address.to_key_format());
    }

    pub fn max_candidates(&mut self, count: u32) {
        self.document
            .append_value(&[], "MaximumListSize", &count.to_string());
    }
}

impl RequestBuilder for AddressValidationBuilder {
    type Parser = AddressValidationParser;

    const OPERATION: Operation = Operation::AddressValidation;

    fn document(&self) -> &RequestDocument {
        &self.document
    }
}

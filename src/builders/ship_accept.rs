use super::{Credentials, RequestBuilder, RequestDocument, ShipConfirmBuilder};
use crate::connection::Operation;
use crate::error::{Result, UpsError};
use crate::parsers::{ShipAcceptParser, ShipConfirmParser};

// Builds a ShipmentAcceptRequest from a confirmed shipment's digest.
#[derive(Debug, Clone)]
pub struct ShipAcceptBuilder {
    document: RequestDocument,
    shipment_digest: String,
}

impl ShipAcceptBuilder {
    pub fn new(credentials: &Credentials, shipment_digest: &str) -> Self {
        let mut document = RequestDocument::new("ShipmentAcceptRequest", credentials);
        document.add_request("ShipAccept", None);
        // The digest is opaque; it is written back exactly as received
        document.append_value(&[], "ShipmentDigest", shipment_digest);
        Self {
            document,
            shipment_digest: shipment_digest.to_string(),
        }
    }

    // Accept request for a confirmation, reusing the confirm request's
    // credentials. Fails when the confirmation carries no digest.
    pub fn from_confirm(confirm: &ShipConfirmBuilder, response: &ShipConfirmParser) -> Result<Self> {
        let digest = response.shipment_digest().ok_or_else(|| {
            UpsError::MalformedResponse("ShipmentConfirmResponse has no ShipmentDigest".to_string())
        })?;
        Ok(Self::new(confirm.credentials(), digest))
    }

    pub fn shipment_digest(&self) -> &str {
        &self.shipment_digest
    }
}

impl RequestBuilder for ShipAcceptBuilder {
    type Parser = ShipAcceptParser;

    const OPERATION: Operation = Operation::ShipAccept;

    fn document(&self) -> &RequestDocument {
        &self.document
    }
}

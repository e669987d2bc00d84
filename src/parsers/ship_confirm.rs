use super::{Charge, Envelope, ResponseParser};

#[derive(Debug, Clone)]
pub struct ShipConfirmParser {
    envelope: Envelope,
}

impl ShipConfirmParser {
    // Opaque token the accept request must echo back.
    pub fn shipment_digest(&self) -> Option<&str> {
        self.envelope
            .root()
            .text_at(&["ShipmentDigest"])
            .filter(|digest| !digest.is_empty())
    }

    pub fn shipment_identification_number(&self) -> Option<&str> {
        self.envelope.root().text_at(&["ShipmentIdentificationNumber"])
    }

    pub fn total_charge(&self) -> Option<Charge> {
        self.envelope
            .root()
            .path(&["ShipmentCharges", "TotalCharges"])
            .and_then(Charge::from_value)
    }
}

impl ResponseParser for ShipConfirmParser {
    fn from_envelope(envelope: Envelope) -> Self {
        Self { envelope }
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_shipment() {
        let parser =
            ShipConfirmParser::parse(include_bytes!("../../samples/ship_confirm_response.xml"))
                .unwrap();

        assert!(parser.is_success());
        assert_eq!(
            parser.shipment_digest(),
            Some("rO0ABXNyACpjb20udXBzLmVjaXMuY29yZS5zaGlwbWVudHMuU2hpcG1lbnREaWdlc3Q=")
        );
        assert_eq!(
            parser.shipment_identification_number(),
            Some("1Z2220060290602143")
        );
        assert_eq!(parser.total_charge().and_then(|c| c.amount()), Some(11.92));
    }

    #[test]
    fn test_rejected_shipment() {
        let parser =
            ShipConfirmParser::parse(include_bytes!("../../samples/ship_confirm_failure.xml"))
                .unwrap();

        assert!(!parser.is_success());
        assert_eq!(
            parser.error_description(),
            Some("Address Validation Error on ShipTo address")
        );
        assert_eq!(parser.shipment_digest(), None);
        assert_eq!(parser.errors()[0].code.as_deref(), Some("120802"));
    }

    #[test]
    fn test_blank_digest_counts_as_absent() {
        let parser = ShipConfirmParser::parse(
            b"<ShipmentConfirmResponse><Response><ResponseStatusCode>1</ResponseStatusCode></Response>\
              <ShipmentDigest></ShipmentDigest></ShipmentConfirmResponse>",
        )
        .unwrap();
        assert_eq!(parser.shipment_digest(), None);
    }
}

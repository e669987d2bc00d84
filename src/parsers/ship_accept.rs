use super::{Charge, Envelope, ResponseParser};

// Shipment results live under this element
const RESULTS: &str = "ShipmentResults";

#[derive(Debug, Clone)]
pub struct ShipAcceptParser {
    envelope: Envelope,
}

impl ShipAcceptParser {
    pub fn shipment_identification_number(&self) -> Option<&str> {
        self.envelope
            .root()
            .text_at(&[RESULTS, "ShipmentIdentificationNumber"])
    }

    // Tracking number of every package, in response order.
    pub fn tracking_numbers(&self) -> Vec<&str> {
        self.envelope
            .root()
            .list_at(&[RESULTS, "PackageResults"])
            .into_iter()
            .filter_map(|package| package.text_at(&["TrackingNumber"]))
            .collect()
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.tracking_numbers()
            .first()
            .copied()
            .or_else(|| self.shipment_identification_number())
    }

    // Base64 label image per package
    pub fn label_images(&self) -> Vec<&str> {
        self.envelope
            .root()
            .list_at(&[RESULTS, "PackageResults"])
            .into_iter()
            .filter_map(|package| package.text_at(&["LabelImage", "GraphicImage"]))
            .collect()
    }

    pub fn total_charge(&self) -> Option<Charge> {
        self.envelope
            .root()
            .path(&[RESULTS, "ShipmentCharges", "TotalCharges"])
            .and_then(Charge::from_value)
    }
}

impl ResponseParser for ShipAcceptParser {
    fn from_envelope(envelope: Envelope) -> Self {
        Self { envelope }
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

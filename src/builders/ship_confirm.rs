use super::{Credentials, Package, Party, RequestBuilder, RequestDocument};
use crate::connection::Operation;
use crate::element::ElementNode;
use crate::parsers::ShipConfirmParser;

// Builds a ShipmentConfirmRequest, the first half of a shipment.
// The credentials it was built with are reused for the ShipmentAcceptRequest
// that follows a successful confirmation.
#[derive(Debug, Clone)]
pub struct ShipConfirmBuilder {
    document: RequestDocument,
}

impl ShipConfirmBuilder {
    pub fn new(credentials: &Credentials) -> Self {
        let mut document = RequestDocument::new("ShipmentConfirmRequest", credentials);
        document.add_request("ShipConfirm", Some("validate"));
        Self { document }
    }

    pub fn add_shipper(&mut self, shipper: &Party) {
        self.document
            .append_node(&["Shipment"], shipper.to_element("Shipper"));
    }

    pub fn add_ship_to(&mut self, ship_to: &Party) {
        self.document
            .append_node(&["Shipment"], ship_to.to_element("ShipTo"));
    }

    pub fn add_ship_from(&mut self, ship_from: &Party) {
        self.document
            .append_node(&["Shipment"], ship_from.to_element("ShipFrom"));
    }

    pub fn add_package(&mut self, package: &Package) {
        self.document.append_node(&["Shipment"], package.to_element());
    }

    pub fn add_service(&mut self, code: &str) {
        self.document
            .append_value(&["Shipment", "Service"], "Code", code);
    }

    pub fn add_description(&mut self, description: &str) {
        self.document
            .append_value(&["Shipment"], "Description", description);
    }

    // Bill the shipper's own account
    pub fn add_payment_information(&mut self, account_number: &str) {
        self.document.append_value(
            &["Shipment", "PaymentInformation", "Prepaid", "BillShipper"],
            "AccountNumber",
            account_number,
        );
    }

    pub fn add_label_specification(&mut self, format: &str) {
        let spec = ElementNode::new("LabelSpecification")
            .with_child(ElementNode::new("LabelPrintMethod").with_value("Code", format))
            .with_child(ElementNode::new("LabelImageFormat").with_value("Code", format));
        self.document.append_node(&[], spec);
    }

    pub fn license_number(&self) -> &str {
        &self.document.credentials().license_number
    }

    pub fn user_id(&self) -> &str {
        &self.document.credentials().user_id
    }

    pub fn password(&self) -> &str {
        &self.document.credentials().password
    }
}

impl RequestBuilder for ShipConfirmBuilder {
    type Parser = ShipConfirmParser;

    const OPERATION: Operation = Operation::ShipConfirm;

    fn document(&self) -> &RequestDocument {
        &self.document
    }
}

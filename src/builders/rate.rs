use super::{Credentials, Package, Party, RequestBuilder, RequestDocument};
use crate::connection::Operation;
use crate::parsers::RatesParser;

// Builds a RatingServiceSelectionRequest.
// By default the carrier quotes the single service given with `add_service`;
// `shop` asks for every available service instead
#[derive(Debug, Clone)]
pub struct RateBuilder {
    document: RequestDocument,
}

impl RateBuilder {
    pub fn new(credentials: &Credentials) -> Self {
        Self::with_option(credentials, "Rate")
    }

    pub fn shop(credentials: &Credentials) -> Self {
        Self::with_option(credentials, "Shop")
    }

    fn with_option(credentials: &Credentials, option: &str) -> Self {
        let mut document = RequestDocument::new("RatingServiceSelectionRequest", credentials);
        document.add_request("Rate", Some(option));
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

    // May be called once per package
    pub fn add_package(&mut self, package: &Package) {
        self.document.append_node(&["Shipment"], package.to_element());
    }

    pub fn add_service(&mut self, code: &str) {
        self.document
            .append_value(&["Shipment", "Service"], "Code", code);
    }

    pub fn add_pickup_type(&mut self, code: &str) {
        self.document.append_value(&["PickupType"], "Code", code);
    }
}

impl RequestBuilder for RateBuilder {
    type Parser = RatesParser;

    const OPERATION: Operation = Operation::Rate;

    fn document(&self) -> &RequestDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{credentials, party};

    #[test]
    fn test_rate_request_layout() {
        let mut builder = RateBuilder::new(&credentials());
        builder.add_shipper(&party("Acme Widgets"));
        builder.add_ship_to(&party("Jane Doe"));
        builder.add_package(&Package::new("5"));
        builder.add_service("03");

        let body = builder.document().body().to_xml().unwrap();
        assert!(body.starts_with(
            "<RatingServiceSelectionRequest><Request><RequestAction>Rate</RequestAction>\
             <RequestOption>Rate</RequestOption></Request><Shipment><Shipper><Name>Acme Widgets</Name>"
        ));
        assert!(body.contains("<ShipTo><CompanyName>Jane Doe</CompanyName>"));
        assert!(body.contains(
            "<Package><PackagingType><Code>02</Code></PackagingType><PackageWeight>\
             <UnitOfMeasurement><Code>LBS</Code></UnitOfMeasurement><Weight>5</Weight></PackageWeight></Package>"
        ));
        assert!(body.ends_with("<Service><Code>03</Code></Service></Shipment></RatingServiceSelectionRequest>"));
    }

    #[test]
    fn test_shop_option() {
        let builder = RateBuilder::shop(&credentials());
        let xml = builder.to_xml().unwrap();
        assert!(xml.contains("<RequestOption>Shop</RequestOption>"));
    }

    #[test]
    fn test_packages_are_appended_in_order() {
        let mut builder = RateBuilder::new(&credentials());
        builder.add_package(&Package::new("1"));
        builder.add_package(&Package::new("2"));

        let shipment = builder.document().body().child("Shipment").unwrap();
        let weights: Vec<_> = shipment
            .children_named("Package")
            .filter_map(|p| p.child("PackageWeight"))
            .filter_map(|w| w.child("Weight"))
            .filter_map(|w| w.text())
            .collect();
        assert_eq!(weights, vec!["1", "2"]);
    }
}

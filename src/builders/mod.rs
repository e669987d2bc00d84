// Request document builders
// Every request body sent to the carrier is two sibling XML documents: an
// AccessRequest carrying credentials, then the operation document.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::connection::Operation;
use crate::element::{serialize, ElementNode};
use crate::error::Result;
use crate::parsers::ResponseParser;

pub mod address_validation;
pub mod quantum_view;
pub mod rate;
pub mod ship_accept;
pub mod ship_confirm;

pub use address_validation::AddressValidationBuilder;
pub use quantum_view::QuantumViewBuilder;
pub use rate::RateBuilder;
pub use ship_accept::ShipAcceptBuilder;
pub use ship_confirm::ShipConfirmBuilder;

pub const ACCESS_REQUEST_TAG: &str = "AccessRequest";
pub const MAX_ADDRESS_LINES: usize = 3;

// Account credentials written into every AccessRequest.
// Builders that take part in a chained operation hand these to the builder
// of the dependent request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub license_number: String,
    pub user_id: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        license_number: impl Into<String>,
        user_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            license_number: license_number.into(),
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    fn to_element(&self) -> ElementNode {
        ElementNode::new(ACCESS_REQUEST_TAG)
            .with_value("AccessLicenseNumber", self.license_number.as_str())
            .with_value("UserId", self.user_id.as_str())
            .with_value("Password", self.password.as_str())
    }
}

// Password stays out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("license_number", &self.license_number)
            .field("user_id", &self.user_id)
            .field("password", &"********")
            .finish()
    }
}

// Shared state of every builder: the access tree and the operation tree.
#[derive(Debug, Clone)]
pub struct RequestDocument {
    credentials: Credentials,
    access: ElementNode,
    body: ElementNode,
}

impl RequestDocument {
    pub fn new(root_tag: &str, credentials: &Credentials) -> Self {
        Self {
            credentials: credentials.clone(),
            access: credentials.to_element(),
            body: ElementNode::new(root_tag),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn access(&self) -> &ElementNode {
        &self.access
    }

    pub fn body(&self) -> &ElementNode {
        &self.body
    }

    // Appends `<tag>value</tag>` under the container reached by `parent`.
    // `parent` is a chain of tags below the body root. Each step picks the
    // most recently appended child with that tag and creates it if absent,
    // so an empty slice targets the root itself.
    pub fn append_value(&mut self, parent: &[&str], tag: &str, value: &str) {
        self.append_node(parent, ElementNode::leaf(tag, value));
    }

    pub fn append_node(&mut self, parent: &[&str], node: ElementNode) {
        self.body.descend_or_create(parent).append_child(node);
    }

    // <Request><RequestAction/>[<RequestOption/>]</Request>, first in every body
    pub fn add_request(&mut self, action: &str, option: Option<&str>) {
        let request = ElementNode::new("Request")
            .with_value("RequestAction", action)
            .with_optional_value("RequestOption", option);
        self.append_node(&[], request);
    }

    // Access document followed by the operation document, no separator.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = serialize(&self.access)?;
        xml.push_str(&serialize(&self.body)?);
        Ok(xml)
    }
}

// A request that can be sent through a `Connection`.
pub trait RequestBuilder {
    type Parser: ResponseParser;

    const OPERATION: Operation;

    fn document(&self) -> &RequestDocument;

    fn credentials(&self) -> &Credentials {
        self.document().credentials()
    }

    fn to_xml(&self) -> Result<String> {
        self.document().to_xml()
    }
}

// The shipping form has three numbered street lines; any further lines are
// joined onto the third
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address_lines: Vec<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country_code: String,
}

impl Address {
    // Shipping form: AddressLine1..3, City, StateProvinceCode, PostalCode, CountryCode
    pub fn to_element(&self) -> ElementNode {
        let mut node = ElementNode::new("Address");
        for (i, line) in self.numbered_lines().into_iter().enumerate() {
            node.append_child(ElementNode::leaf(format!("AddressLine{}", i + 1), line));
        }
        node.with_value("City", self.city.as_str())
            .with_optional_value("StateProvinceCode", self.state.as_deref())
            .with_value("PostalCode", self.postal_code.as_str())
            .with_value("CountryCode", self.country_code.as_str())
    }

    fn numbered_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .address_lines
            .iter()
            .take(MAX_ADDRESS_LINES)
            .cloned()
            .collect();
        if self.address_lines.len() > MAX_ADDRESS_LINES {
            let overflow = self.address_lines[MAX_ADDRESS_LINES - 1..].join(" ");
            if let Some(last) = lines.last_mut() {
                *last = overflow;
            }
        }
        lines
    }

    // Street-level validation form used by XAV requests and responses
    pub fn to_key_format(&self) -> ElementNode {
        let mut node = ElementNode::new("AddressKeyFormat");
        for line in &self.address_lines {
            node.append_child(ElementNode::leaf("AddressLine", line.as_str()));
        }
        node.with_value("PoliticalDivision2", self.city.as_str())
            .with_optional_value("PoliticalDivision1", self.state.as_deref())
            .with_value("PostcodePrimaryLow", self.postal_code.as_str())
            .with_value("CountryCode", self.country_code.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub company_name: String,
    pub attention_name: Option<String>,
    pub phone_number: Option<String>,
    pub shipper_number: Option<String>,
    pub address: Address,
}

impl Party {
    pub(crate) fn to_element(&self, tag: &str) -> ElementNode {
        // The shipper is named with <Name>, every other party with <CompanyName>
        let name_tag = if tag == "Shipper" { "Name" } else { "CompanyName" };
        ElementNode::new(tag)
            .with_value(name_tag, self.company_name.as_str())
            .with_optional_value("AttentionName", self.attention_name.as_deref())
            .with_optional_value("PhoneNumber", self.phone_number.as_deref())
            .with_optional_value("ShipperNumber", self.shipper_number.as_deref())
            .with_child(self.address.to_element())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub packaging_code: String,
    pub weight: String,
    pub weight_unit: String,
    pub description: Option<String>,
}

impl Default for Package {
    fn default() -> Self {
        Self {
            packaging_code: "02".to_string(),
            weight: "1".to_string(),
            weight_unit: "LBS".to_string(),
            description: None,
        }
    }
}

impl Package {
    pub fn new(weight: impl Into<String>) -> Self {
        Self {
            weight: weight.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_element(&self) -> ElementNode {
        ElementNode::new("Package")
            .with_child(
                ElementNode::new("PackagingType").with_value("Code", self.packaging_code.as_str()),
            )
            .with_optional_value("Description", self.description.as_deref())
            .with_child(
                ElementNode::new("PackageWeight")
                    .with_child(
                        ElementNode::new("UnitOfMeasurement")
                            .with_value("Code", self.weight_unit.as_str()),
                    )
                    .with_value("Weight", self.weight.as_str()),
            )
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::credentials;
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_document_starts_with_access_request() {
        let doc = RequestDocument::new("RatingServiceSelectionRequest", &credentials());
        let xml = doc.to_xml().unwrap();

        assert!(xml.starts_with(
            "<?xml version=\"1.0\"?><AccessRequest><AccessLicenseNumber>LIC123</AccessLicenseNumber>\
             <UserId>shipper</UserId><Password>s3cret</Password></AccessRequest>"
        ));
        assert!(xml.ends_with("<?xml version=\"1.0\"?><RatingServiceSelectionRequest/>"));
    }

    #[test]
    fn test_to_xml_is_access_then_body() {
        let mut doc = RequestDocument::new("QuantumViewRequest", &credentials());
        doc.add_request("QVEvents", None);

        let expected = format!(
            "{}{}",
            serialize(doc.access()).unwrap(),
            serialize(doc.body()).unwrap()
        );
        let xml = doc.to_xml().unwrap();
        assert_eq!(xml, expected);

        // The access document closes before the body document opens
        let access_end = xml.find("</AccessRequest>").unwrap();
        let body_start = xml.find("<QuantumViewRequest>").unwrap();
        assert!(access_end < body_start);
        assert_eq!(xml.matches("<?xml").count(), 2);
    }

    #[test]
    fn test_to_xml_is_idempotent() {
        let mut doc = RequestDocument::new("ShipmentAcceptRequest", &credentials());
        doc.add_request("ShipAccept", None);
        doc.append_value(&[], "ShipmentDigest", "AB12==");

        assert_eq!(doc.to_xml().unwrap(), doc.to_xml().unwrap());
    }

    #[test]
    fn test_append_value_creates_containers() {
        let mut doc = RequestDocument::new("ShipmentConfirmRequest", &credentials());
        doc.append_value(&["Shipment", "Service"], "Code", "03");
        doc.append_value(&["Shipment"], "Description", "Books");

        assert_eq!(
            doc.body().to_xml().unwrap(),
            "<ShipmentConfirmRequest><Shipment><Service><Code>03</Code></Service>\
             <Description>Books</Description></Shipment></ShipmentConfirmRequest>"
        );
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("LIC123"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_address_forms() {
        let address = fixtures::address();
        assert_eq!(
            address.to_element().to_xml().unwrap(),
            "<Address><AddressLine1>12380 Morris Road</AddressLine1><City>Alpharetta</City>\
             <StateProvinceCode>GA</StateProvinceCode><PostalCode>30005</PostalCode>\
             <CountryCode>US</CountryCode></Address>"
        );
        assert_eq!(
            address.to_key_format().to_xml().unwrap(),
            "<AddressKeyFormat><AddressLine>12380 Morris Road</AddressLine>\
             <PoliticalDivision2>Alpharetta</PoliticalDivision2><PoliticalDivision1>GA</PoliticalDivision1>\
             <PostcodePrimaryLow>30005</PostcodePrimaryLow><CountryCode>US</CountryCode></AddressKeyFormat>"
        );
    }

    #[test_case(&["1 Main St"], &["1 Main St"]; "one line")]
    #[test_case(&["1 Main St", "Floor 2", "Suite 3"], &["1 Main St", "Floor 2", "Suite 3"]; "three lines")]
    #[test_case(&["1 Main St", "Floor 2", "Suite 3", "Dock B"], &["1 Main St", "Floor 2", "Suite 3 Dock B"]; "extra lines joined")]
    fn test_address_line_limit(lines: &[&str], expected: &[&str]) {
        let address = Address {
            address_lines: lines.iter().map(|l| l.to_string()).collect(),
            ..fixtures::address()
        };
        let element = address.to_element();
        let written: Vec<_> = element
            .children()
            .iter()
            .filter(|c| c.tag().starts_with("AddressLine"))
            .filter_map(|c| c.text())
            .collect();
        assert_eq!(written, expected);
        assert!(element.child("AddressLine4").is_none());
    }

    #[test]
    fn test_shipper_uses_name_tag() {
        let shipper = fixtures::party("Acme").to_element("Shipper").to_xml().unwrap();
        let ship_to = fixtures::party("Acme").to_element("ShipTo").to_xml().unwrap();
        assert!(shipper.starts_with("<Shipper><Name>Acme</Name>"));
        assert!(ship_to.starts_with("<ShipTo><CompanyName>Acme</CompanyName>"));
    }
}

// Client library for the UPS XML shipping, rating and tracking API

pub mod builders;
pub mod config;
pub mod connection;
pub mod element;
pub mod error;
pub mod parsers;
pub mod transport;

// Re-export key types for convenience
pub use builders::{
    Address, AddressValidationBuilder, Credentials, Package, Party, QuantumViewBuilder,
    RateBuilder, RequestBuilder, RequestDocument, ShipAcceptBuilder, ShipConfirmBuilder,
};
pub use config::ClientConfig;
pub use connection::{Connection, Operation, ShipOutcome};
pub use element::ElementNode;
pub use error::{Result, TransportError, UpsError};
pub use parsers::{
    parse_document, AddressClassification, AddressValidationParser, CarrierError, Charge,
    Envelope, QuantumViewParser, RatedShipment, RatesParser, ResponseParser, ShipAcceptParser,
    ShipConfirmParser, SubscriptionEvent, SubscriptionFile, Value,
};
pub use transport::{HttpResponse, HttpTransport, MockTransport, RecordedCall, Transport};

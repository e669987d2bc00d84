// Connection: drives each operation from builder to parsed response
use tracing::{debug, info, instrument, warn};

use crate::builders::{
    AddressValidationBuilder, QuantumViewBuilder, RateBuilder, RequestBuilder, ShipAcceptBuilder,
    ShipConfirmBuilder,
};
use crate::config::ClientConfig;
use crate::error::{Result, TransportError};
use crate::parsers::{
    AddressValidationParser, QuantumViewParser, RatesParser, ResponseParser, ShipAcceptParser,
    ShipConfirmParser,
};
use crate::transport::{HttpTransport, Transport};

pub const RATE_PATH: &str = "/ups.app/xml/Rate";
pub const SHIP_CONFIRM_PATH: &str = "/ups.app/xml/ShipConfirm";
pub const SHIP_ACCEPT_PATH: &str = "/ups.app/xml/ShipAccept";
pub const ADDRESS_PATH: &str = "/ups.app/xml/XAV";
pub const QUANTUM_VIEW_PATH: &str = "/ups.app/xml/QVEvents";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Rate,
    ShipConfirm,
    ShipAccept,
    AddressValidation,
    QuantumView,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Operation::Rate => RATE_PATH,
            Operation::ShipConfirm => SHIP_CONFIRM_PATH,
            Operation::ShipAccept => SHIP_ACCEPT_PATH,
            Operation::AddressValidation => ADDRESS_PATH,
            Operation::QuantumView => QUANTUM_VIEW_PATH,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Rate => "rate",
            Operation::ShipConfirm => "ship_confirm",
            Operation::ShipAccept => "ship_accept",
            Operation::AddressValidation => "address_validation",
            Operation::QuantumView => "quantum_view",
        }
    }
}

// Result of a two-phase shipment.
#[derive(Debug)]
pub enum ShipOutcome {
    // Both requests were sent. The accept response may still report a
    // carrier-side failure.
    Accepted {
        confirm: ShipConfirmParser,
        accept: ShipAcceptParser,
    },
    // The confirmation was rejected, so no accept request was sent.
    Aborted(ShipConfirmParser),
}

impl ShipOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ShipOutcome::Accepted { accept, .. } if accept.is_success())
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ShipOutcome::Aborted(_))
    }

    pub fn confirm(&self) -> &ShipConfirmParser {
        match self {
            ShipOutcome::Accepted { confirm, .. } => confirm,
            ShipOutcome::Aborted(confirm) => confirm,
        }
    }

    pub fn accept(&self) -> Option<&ShipAcceptParser> {
        match self {
            ShipOutcome::Accepted { accept, .. } => Some(accept),
            ShipOutcome::Aborted(_) => None,
        }
    }

    // Description from whichever response ended the operation
    pub fn error_description(&self) -> Option<&str> {
        match self {
            ShipOutcome::Accepted { accept, .. } => accept.error_description(),
            ShipOutcome::Aborted(confirm) => confirm.error_description(),
        }
    }

    pub fn tracking_number(&self) -> Option<&str> {
        self.accept().and_then(ShipAcceptParser::tracking_number)
    }
}

// Sending happens between states; an accept request only exists once a
// confirmation succeeded and produced a digest.
enum ShipState {
    ConfirmBuilt,
    ConfirmParsed(ShipConfirmParser),
    AcceptBuilt {
        confirm: ShipConfirmParser,
        request: ShipAcceptBuilder,
    },
    AcceptParsed {
        confirm: ShipConfirmParser,
        accept: ShipAcceptParser,
    },
}

// Entry point for rate, ship, address validation and tracking requests.
// Holds only the endpoint configuration and the transport, so one
// connection can serve concurrent operations that each own their builder.
pub struct Connection<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl Connection<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout_ms)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> Connection<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url(&self) -> &'static str {
        self.config.base_url()
    }

    fn build_url(&self, operation: Operation) -> String {
        format!("{}{}", self.url(), operation.path())
    }

    // Serializes `builder`, posts it, and parses the reply.
    // A carrier rejection comes back as a parser whose `is_success()` is
    // false. Errors are reserved for transport failures, bodies that are
    // not a carrier envelope, and non-2xx replies without an envelope.
    #[instrument(skip_all, fields(operation = B::OPERATION.name()))]
    pub async fn send<B: RequestBuilder>(&self, builder: &B) -> Result<B::Parser> {
        let url = self.build_url(B::OPERATION);
        let body = builder.to_xml()?;
        debug!(%url, bytes = body.len(), "sending request");

        let response = self.transport.post(&url, body).await?;
        let status_code = response.status_code;
        let parsed = <B::Parser as ResponseParser>::parse(&response.body);

        if response.is_success() {
            let parser = parsed?;
            info!(status_code, success = parser.is_success(), "received response");
            return Ok(parser);
        }

        match parsed {
            Ok(parser) => {
                warn!(status_code, "carrier envelope returned with HTTP error status");
                Ok(parser)
            }
            Err(_) => Err(TransportError::Status {
                status_code,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            }
            .into()),
        }
    }

    pub async fn rates(&self, builder: &RateBuilder) -> Result<RatesParser> {
        self.send(builder).await
    }

    pub async fn rates_with<F>(&self, configure: F) -> Result<RatesParser>
    where
        F: FnOnce(&mut RateBuilder),
    {
        let mut builder = RateBuilder::new(&self.config.credentials);
        configure(&mut builder);
        self.rates(&builder).await
    }

    // Confirms a shipment and, only if the carrier accepted the
    // confirmation, accepts it using the returned digest.
    #[instrument(skip_all)]
    pub async fn ship(&self, confirm_builder: &ShipConfirmBuilder) -> Result<ShipOutcome> {
        let mut state = ShipState::ConfirmBuilt;
        loop {
            state = match state {
                ShipState::ConfirmBuilt => {
                    ShipState::ConfirmParsed(self.send(confirm_builder).await?)
                }
                ShipState::ConfirmParsed(confirm) if !confirm.is_success() => {
                    warn!(
                        reason = confirm.error_description().unwrap_or("unknown"),
                        "shipment confirmation rejected, not sending accept"
                    );
                    return Ok(ShipOutcome::Aborted(confirm));
                }
                ShipState::ConfirmParsed(confirm) => {
                    let request = ShipAcceptBuilder::from_confirm(confirm_builder, &confirm)?;
                    ShipState::AcceptBuilt { confirm, request }
                }
                ShipState::AcceptBuilt { confirm, request } => ShipState::AcceptParsed {
                    confirm,
                    accept: self.send(&request).await?,
                },
                ShipState::AcceptParsed { confirm, accept } => {
                    return Ok(ShipOutcome::Accepted { confirm, accept });
                }
            };
        }
    }

    pub async fn ship_with<F>(&self, configure: F) -> Result<ShipOutcome>
    where
        F: FnOnce(&mut ShipConfirmBuilder),
    {
        let mut builder = ShipConfirmBuilder::new(&self.config.credentials);
        configure(&mut builder);
        self.ship(&builder).await
    }

    pub async fn track(&self, builder: &QuantumViewBuilder) -> Result<QuantumViewParser> {
        self.send(builder).await
    }

    pub async fn track_with<F>(&self, configure: F) -> Result<QuantumViewParser>
    where
        F: FnOnce(&mut QuantumViewBuilder),
    {
        let mut builder = QuantumViewBuilder::new(&self.config.credentials);
        configure(&mut builder);
        self.track(&builder).await
    }

    pub async fn validate_address(
        &self,
        builder: &AddressValidationBuilder,
    ) -> Result<AddressValidationParser> {
        self.send(builder).await
    }

    pub async fn validate_address_with<F>(&self, configure: F) -> Result<AddressValidationParser>
    where
        F: FnOnce(&mut AddressValidationBuilder),
    {
        let mut builder = AddressValidationBuilder::new(&self.config.credentials);
        configure(&mut builder);
        self.validate_address(&builder).await
    }
}

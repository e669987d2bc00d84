use serde::Serialize;

use super::{Charge, Envelope, ResponseParser, Value};

// A quote for one service level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatedShipment {
    pub service_code: String,
    pub total_charge: Option<Charge>,
    pub guaranteed_days: Option<String>,
}

impl RatedShipment {
    fn from_value(value: &Value) -> Self {
        Self {
            service_code: value
                .text_at(&["Service", "Code"])
                .unwrap_or_default()
                .to_string(),
            total_charge: value.get("TotalCharges").and_then(Charge::from_value),
            guaranteed_days: value
                .text_at(&["GuaranteedDaysToDelivery"])
                .filter(|days| !days.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RatesParser {
    envelope: Envelope,
}

impl RatesParser {
    // One entry per quoted service, in response order
    pub fn rated_shipments(&self) -> Vec<RatedShipment> {
        self.envelope
            .root()
            .list_at(&["RatedShipment"])
            .into_iter()
            .map(RatedShipment::from_value)
            .collect()
    }

    // Total charge of the first quote.
    pub fn rate_total_charge(&self) -> Option<Charge> {
        self.envelope
            .root()
            .path(&["RatedShipment", "TotalCharges"])
            .and_then(Charge::from_value)
    }
}

impl ResponseParser for RatesParser {
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

    const SAMPLE: &str = include_str!("../../samples/rate_response.xml");

    #[test]
    fn test_rated_shipments_in_order() {
        let parser = RatesParser::parse(SAMPLE.as_bytes()).unwrap();
        assert!(parser.is_success());

        let shipments = parser.rated_shipments();
        let codes: Vec<_> = shipments.iter().map(|s| s.service_code.as_str()).collect();
        assert_eq!(codes, vec!["03", "02", "01"]);
        assert_eq!(shipments[0].guaranteed_days, None);
        assert_eq!(shipments[2].guaranteed_days.as_deref(), Some("1"));
        assert_eq!(
            shipments[1].total_charge.as_ref().and_then(Charge::amount),
            Some(28.4)
        );
    }

    #[test]
    fn test_rate_total_charge() {
        let parser = RatesParser::parse(SAMPLE.as_bytes()).unwrap();
        let charge = parser.rate_total_charge().unwrap();
        assert_eq!(charge.currency_code, "USD");
        assert_eq!(charge.monetary_value, "11.92");
    }

    #[test]
    fn test_single_quote() {
        let xml = "<RatingServiceSelectionResponse><Response><ResponseStatusCode>1</ResponseStatusCode>\
            </Response><RatedShipment><Service><Code>03</Code></Service><TotalCharges>\
            <CurrencyCode>EUR</CurrencyCode><MonetaryValue>9.10</MonetaryValue></TotalCharges>\
            </RatedShipment></RatingServiceSelectionResponse>";

        let parser = RatesParser::parse(xml.as_bytes()).unwrap();
        assert_eq!(parser.rated_shipments().len(), 1);
        assert_eq!(
            parser.rate_total_charge().map(|c| c.currency_code),
            Some("EUR".to_string())
        );
    }

    #[test]
    fn test_failed_rating_has_no_quotes() {
        let xml = "<RatingServiceSelectionResponse><Response><ResponseStatusCode>0</ResponseStatusCode>\
            <ResponseStatusDescription>Failure</ResponseStatusDescription></Response>\
            </RatingServiceSelectionResponse>";

        let parser = RatesParser::parse(xml.as_bytes()).unwrap();
        assert!(!parser.is_success());
        assert_eq!(parser.error_description(), Some("Failure"));
        assert!(parser.rated_shipments().is_empty());
        assert_eq!(parser.rate_total_charge(), None);
    }
}

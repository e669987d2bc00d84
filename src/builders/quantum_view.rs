use chrono::NaiveDateTime;

use super::{Credentials, RequestBuilder, RequestDocument};
use crate::connection::Operation;
use crate::parsers::QuantumViewParser;

// Timestamp layout expected in DateTimeRange
const DATE_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

// Builds a QuantumViewRequest for subscription events.
// Without a subscription name or date range the carrier returns every
// unread event file for the account.
#[derive(Debug, Clone)]
pub struct QuantumViewBuilder {
    document: RequestDocument,
}

impl QuantumViewBuilder {
    pub fn new(credentials: &Credentials) -> Self {
        let mut document = RequestDocument::new("QuantumViewRequest", credentials);
        document.add_request("QVEvents", None);
        Self { document }
    }

    pub fn add_subscription_name(&mut self, name: &str) {
        self.document
            .append_value(&["SubscriptionRequest"], "Name", name);
    }

    pub fn add_date_time_range(&mut self, begin: NaiveDateTime, end: NaiveDateTime) {
        let range = ["SubscriptionRequest", "DateTimeRange"];
        self.document.append_value(
            &range,
            "BeginDateTime",
            &begin.format(DATE_TIME_FORMAT).to_string(),
        );
        self.document
            .append_value(&range, "EndDateTime", &end.format(DATE_TIME_FORMAT).to_string());
    }

    // Continues a previous, truncated response
    pub fn add_bookmark(&mut self, bookmark: &str) {
        self.document.append_value(&[], "Bookmark", bookmark);
    }
}

impl RequestBuilder for QuantumViewBuilder {
    type Parser = QuantumViewParser;

    const OPERATION: Operation = Operation::QuantumView;

    fn document(&self) -> &RequestDocument {
        &self.document
    }
}

use serde::Serialize;

use super::{Envelope, ResponseParser, Value};

const EVENTS: &str = "QuantumViewEvents";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionFile {
    pub file_name: String,
    pub status_code: Option<String>,
    pub status_description: Option<String>,
}

impl SubscriptionFile {
    fn from_value(value: &Value) -> Self {
        Self {
            file_name: value.text_at(&["FileName"]).unwrap_or_default().to_string(),
            status_code: value.text_at(&["StatusType", "Code"]).map(str::to_string),
            status_description: value
                .text_at(&["StatusType", "Description"])
                .map(str::to_string),
        }
    }
}

// One subscription's slice of a QuantumView response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionEvent {
    pub name: Option<String>,
    pub number: Option<String>,
    pub status_code: Option<String>,
    pub status_description: Option<String>,
    pub files: Vec<SubscriptionFile>,
}

impl SubscriptionEvent {
    fn from_value(value: &Value) -> Self {
        Self {
            name: value.text_at(&["Name"]).map(str::to_string),
            number: value.text_at(&["Number"]).map(str::to_string),
            status_code: value
                .text_at(&["SubscriptionStatus", "Code"])
                .map(str::to_string),
            status_description: value
                .text_at(&["SubscriptionStatus", "Description"])
                .map(str::to_string),
            files: value
                .list_at(&["SubscriptionFile"])
                .into_iter()
                .map(SubscriptionFile::from_value)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuantumViewParser {
    envelope: Envelope,
}

impl QuantumViewParser {
    pub fn subscriber_id(&self) -> Option<&str> {
        self.envelope.root().text_at(&[EVENTS, "SubscriberID"])
    }

    // Subscription events in response order. A single event is still
    // returned as a one-element list.
    pub fn quantum_view_events(&self) -> Vec<SubscriptionEvent> {
        self.envelope
            .root()
            .list_at(&[EVENTS, "SubscriptionEvents"])
            .into_iter()
            .map(SubscriptionEvent::from_value)
            .collect()
    }

    // Present when more data is waiting to be fetched
    pub fn bookmark(&self) -> Option<&str> {
        self.envelope.root().text_at(&["Bookmark"])
    }
}

impl ResponseParser for QuantumViewParser {
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

    const SAMPLE: &str = include_str!("../../samples/quantum_view_response.xml");

    fn response_with_events(events: &[&str]) -> String {
        let events: String = events
            .iter()
            .map(|name| format!("<SubscriptionEvents><Name>{}</Name></SubscriptionEvents>", name))
            .collect();
        format!(
            "<QuantumViewResponse><Response><ResponseStatusCode>1</ResponseStatusCode></Response>\
             <QuantumViewEvents><SubscriberID>acme</SubscriberID>{}</QuantumViewEvents>\
             </QuantumViewResponse>",
            events
        )
    }

    #[test]
    fn test_sample_events() {
        let parser = QuantumViewParser::parse(SAMPLE.as_bytes()).unwrap();
        assert!(parser.is_success());
        assert_eq!(parser.subscriber_id(), Some("acme_shipping"));
        assert_eq!(parser.bookmark(), Some("WE1TWE1TWE1T"));

        let events = parser.quantum_view_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].name.as_deref(), Some("OutboundDaily"));
        assert_eq!(events[0].files.len(), 2);
        assert_eq!(events[0].files[1].status_code.as_deref(), Some("R"));
        // A lone SubscriptionFile is still a list
        assert_eq!(events[1].files.len(), 1);
        assert_eq!(events[1].files[0].file_name, "240301_090000003");
        assert!(events[2].files.is_empty());
        assert_eq!(events[2].status_description.as_deref(), Some("Expired"));
    }

    #[test]
    fn test_single_event_is_a_list() {
        let xml = response_with_events(&["OnlyOne"]);
        let parser = QuantumViewParser::parse(xml.as_bytes()).unwrap();

        let events = parser.quantum_view_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name.as_deref(), Some("OnlyOne"));
    }

    #[test]
    fn test_three_events_keep_source_order() {
        let xml = response_with_events(&["first", "second", "third"]);
        let parser = QuantumViewParser::parse(xml.as_bytes()).unwrap();

        let names: Vec<_> = parser
            .quantum_view_events()
            .into_iter()
            .filter_map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_no_events() {
        let xml = response_with_events(&[]);
        let parser = QuantumViewParser::parse(xml.as_bytes()).unwrap();
        assert!(parser.quantum_view_events().is_empty());
        assert_eq!(parser.bookmark(), None);
    }

    #[test]
    fn test_accessors_are_repeatable() {
        let parser = QuantumViewParser::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(parser.quantum_view_events(), parser.quantum_view_events());
    }
}

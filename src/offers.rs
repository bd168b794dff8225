use serde::{Deserialize, Serialize};

// Data structures for the provider records relayed by /api/autocomplete and /api/search.
// Fields we don't read are ignored on deserialization.

// A single city match from the location lookup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocationSuggestion {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "iataCode")]
    pub code: String,
}

impl LocationSuggestion {
    pub fn new(display_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FlightOffer {
    pub itineraries: Vec<Itinerary>,
    pub price: OfferPrice,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Itinerary {
    // ISO-8601 period such as "PT2H30M"
    pub duration: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Segment {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OfferPrice {
    // Decimal string, kept verbatim from the provider
    pub total: String,
    pub currency: String,
}

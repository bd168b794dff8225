// Search form model and the coordinator that turns it into a relay search

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::formatter::{format_date, format_number_input};
use crate::offers::FlightOffer;
use crate::relay_client::RelayClient;
use crate::render::{render, RenderError, RenderedResults};
use crate::suggest_cache::{LocationField, SuggestCache};

pub const ROUND_TRIP: &str = "round-trip";
pub const ONE_WAY: &str = "one-way";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("No location code for {field} {input:?}; pick one of the suggestions")]
    UnresolvedLocation { field: LocationField, input: String },

    #[error("Return date required for a round trip")]
    MissingReturnDate,

    #[error("Invalid passenger count for {field}: {input:?}")]
    InvalidPassengerCount { field: &'static str, input: String },

    #[error("Unknown travel class: {0}")]
    UnknownTravelClass(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripType {
    OneWay,
    RoundTrip,
}

impl TripType {
    // Only the exact round-trip selector value means round trip
    pub fn from_selector(value: &str) -> Self {
        if value == ROUND_TRIP {
            TripType::RoundTrip
        } else {
            TripType::OneWay
        }
    }

    pub fn as_selector(&self) -> &'static str {
        match self {
            TripType::OneWay => ONE_WAY,
            TripType::RoundTrip => ROUND_TRIP,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl TravelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::PremiumEconomy => "PREMIUM_ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelClass {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ECONOMY" => Ok(TravelClass::Economy),
            "PREMIUM_ECONOMY" => Ok(TravelClass::PremiumEconomy),
            "BUSINESS" => Ok(TravelClass::Business),
            "FIRST" => Ok(TravelClass::First),
            other => Err(SearchError::UnknownTravelClass(other.to_string())),
        }
    }
}

/// Current values of the search form inputs.
///
/// Location and passenger fields hold the raw text the user typed; the trip
/// type holds the selector value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub origin: String,
    pub destination: String,
    pub trip_type: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub travel_class: TravelClass,
    pub adults: String,
    pub children: String,
    pub infants: String,
}

impl Default for SearchForm {
    fn default() -> Self {
        let today = Utc::now().date_naive();
        Self {
            origin: String::new(),
            destination: String::new(),
            trip_type: ONE_WAY.to_string(),
            departure_date: today,
            return_date: Some(today),
            travel_class: TravelClass::Economy,
            adults: "1".to_string(),
            children: "0".to_string(),
            infants: "0".to_string(),
        }
    }
}

impl SearchForm {
    pub fn trip_type(&self) -> TripType {
        TripType::from_selector(&self.trip_type)
    }

    // The search button stays disabled until both locations have text
    pub fn can_search(&self) -> bool {
        !self.origin.is_empty() && !self.destination.is_empty()
    }

    pub fn shows_return_date(&self) -> bool {
        self.trip_type() == TripType::RoundTrip
    }
}

/// Query parameters of `GET /api/search`. `returnDate` is only sent for round
/// trips; its absence is what marks a search as one-way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(rename = "origin")]
    pub origin_code: String,
    #[serde(rename = "destination")]
    pub destination_code: String,
    pub departure_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub adults: String,
    pub children: String,
    pub infants: String,
    pub travel_class: TravelClass,
}

pub fn build_criteria(
    form: &SearchForm,
    origin_codes: &SuggestCache,
    destination_codes: &SuggestCache,
) -> Result<SearchCriteria, SearchError> {
    let origin_code = resolve_location(LocationField::Origin, &form.origin, origin_codes)?;
    let destination_code = resolve_location(
        LocationField::Destination,
        &form.destination,
        destination_codes,
    )?;

    let return_date = match form.trip_type() {
        TripType::RoundTrip => Some(format_date(
            form.return_date.ok_or(SearchError::MissingReturnDate)?,
        )),
        TripType::OneWay => None,
    };

    Ok(SearchCriteria {
        origin_code,
        destination_code,
        departure_date: format_date(form.departure_date),
        return_date,
        adults: passenger_count("adults", &form.adults)?,
        children: passenger_count("children", &form.children)?,
        infants: passenger_count("infants", &form.infants)?,
        travel_class: form.travel_class,
    })
}

fn resolve_location(
    field: LocationField,
    input: &str,
    codes: &SuggestCache,
) -> Result<String, SearchError> {
    codes
        .resolve(input)
        .ok_or_else(|| SearchError::UnresolvedLocation {
            field,
            input: input.to_string(),
        })
}

fn passenger_count(field: &'static str, input: &str) -> Result<String, SearchError> {
    format_number_input(input).ok_or_else(|| SearchError::InvalidPassengerCount {
        field,
        input: input.to_string(),
    })
}

pub struct SearchCoordinator<C: RelayClient> {
    client: Arc<C>,
    origin_codes: SuggestCache,
    destination_codes: SuggestCache,
}

impl<C: RelayClient> SearchCoordinator<C> {
    pub fn new(client: Arc<C>, origin_codes: SuggestCache, destination_codes: SuggestCache) -> Self {
        Self {
            client,
            origin_codes,
            destination_codes,
        }
    }

    pub fn build_criteria(&self, form: &SearchForm) -> Result<SearchCriteria, SearchError> {
        build_criteria(form, &self.origin_codes, &self.destination_codes)
    }

    /// Sends one search for the form's current values.
    ///
    /// Form problems are returned as errors before anything is sent. Relay
    /// failures of any kind come back as an empty list, the same as a search
    /// with no offers.
    pub async fn search(&self, form: &SearchForm) -> Result<Vec<FlightOffer>, SearchError> {
        let criteria = self.build_criteria(form)?;
        info!(
            "Searching {} → {} on {} ({})",
            criteria.origin_code,
            criteria.destination_code,
            criteria.departure_date,
            form.trip_type().as_selector()
        );

        match self.client.search(&criteria).await {
            Ok(offers) => {
                info!("Search returned {} offers", offers.len());
                Ok(offers)
            }
            Err(e) => {
                warn!("Search failed, showing no results: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn search_and_render(
        &self,
        form: &SearchForm,
    ) -> Result<RenderedResults, SearchError> {
        let offers = self.search(form).await?;
        Ok(render(&offers)?)
    }
}

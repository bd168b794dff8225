// Flight search: the client-side autosuggest and search flow, and the relay
// server that proxies it to the flight-data provider

// Client core
pub mod autosuggest;
pub mod debounce;
pub mod formatter;
pub mod offers;
pub mod relay_client;
pub mod render;
pub mod search;
pub mod session;
pub mod suggest_cache;

// Relay
pub mod config;
pub mod provider;
pub mod server;

// Re-export key types for convenience
pub use autosuggest::{AutosuggestController, SelectionList, AUTOSUGGEST_QUIET_PERIOD};
pub use formatter::{format_date, format_number, format_number_input};
pub use offers::{FlightOffer, Itinerary, LocationSuggestion, OfferPrice, Segment};
pub use relay_client::{ClientConfig, HttpRelayClient, RelayClient, RelayError};
pub use render::{render, RenderError, RenderedResults, ResultItem};
pub use search::{
    SearchCoordinator, SearchCriteria, SearchError, SearchForm, TravelClass, TripType,
};
pub use session::SearchSession;
pub use suggest_cache::{LocationField, SuggestCache};

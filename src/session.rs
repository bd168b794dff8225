// One search form: its values, one autosuggest controller per location input
// and the coordinator that reads their caches.

use std::sync::Arc;
use std::time::Duration;

use crate::autosuggest::{AutosuggestController, AUTOSUGGEST_QUIET_PERIOD};
use crate::relay_client::RelayClient;
use crate::render::RenderedResults;
use crate::search::{SearchCoordinator, SearchError, SearchForm};
use crate::suggest_cache::{LocationField, SuggestCache};

pub struct SearchSession<C: RelayClient> {
    form: SearchForm,
    origin: AutosuggestController<C>,
    destination: AutosuggestController<C>,
    coordinator: SearchCoordinator<C>,
}

impl<C: RelayClient> SearchSession<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self::with_quiet_period(client, AUTOSUGGEST_QUIET_PERIOD)
    }

    pub fn with_quiet_period(client: Arc<C>, quiet_period: Duration) -> Self {
        let origin_codes = SuggestCache::new();
        let destination_codes = SuggestCache::new();

        Self {
            form: SearchForm::default(),
            origin: AutosuggestController::new(
                LocationField::Origin,
                client.clone(),
                origin_codes.clone(),
            )
            .with_quiet_period(quiet_period),
            destination: AutosuggestController::new(
                LocationField::Destination,
                client.clone(),
                destination_codes.clone(),
            )
            .with_quiet_period(quiet_period),
            coordinator: SearchCoordinator::new(client, origin_codes, destination_codes),
        }
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SearchForm {
        &mut self.form
    }

    pub fn input_origin(&mut self, text: &str) {
        self.form.origin = text.to_string();
        self.origin.schedule_lookup(text);
    }

    pub fn input_destination(&mut self, text: &str) {
        self.form.destination = text.to_string();
        self.destination.schedule_lookup(text);
    }

    pub fn origin_options(&self) -> Vec<String> {
        self.origin.options().options()
    }

    pub fn destination_options(&self) -> Vec<String> {
        self.destination.options().options()
    }

    pub fn can_search(&self) -> bool {
        self.form.can_search()
    }

    // Form values go back to their defaults; fetched suggestions are kept
    pub fn reset(&mut self) {
        self.form = SearchForm::default();
    }

    pub async fn search(&self) -> Result<RenderedResults, SearchError> {
        self.coordinator.search_and_render(&self.form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::LocationSuggestion;
    use crate::relay_client::mock_relay::MockRelay;
    use crate::render::fixtures::{itinerary, offer};
    use crate::render::ResultItem;
    use crate::search::{TravelClass, ROUND_TRIP};
    use chrono::NaiveDate;

    const QUIET: Duration = Duration::from_millis(100);

    async fn settle() {
        tokio::time::sleep(QUIET * 2).await;
        tokio::task::yield_now().await;
    }

    fn relay() -> Arc<MockRelay> {
        let relay = Arc::new(MockRelay::new());
        relay.add_suggestions("Madrid", vec![LocationSuggestion::new("MADRID", "MAD")]);
        relay.add_suggestions("New", vec![LocationSuggestion::new("NEW YORK", "NYC")]);
        relay
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_round_trip_flow() {
        let relay = relay();
        relay.set_offers(vec![offer(
            vec![
                itinerary("PT8H20M", &[("MAD", "JFK")]),
                itinerary("PT7H", &[("JFK", "LIS"), ("LIS", "MAD")]),
            ],
            "640.10",
            "EUR",
        )]);

        let mut session = SearchSession::with_quiet_period(relay.clone(), QUIET);
        assert!(!session.can_search());

        session.input_origin("Madrid");
        session.input_destination("New");
        settle().await;

        assert_eq!(session.origin_options(), vec!["MADRID".to_string()]);
        assert_eq!(session.destination_options(), vec!["NEW YORK".to_string()]);

        // The user picks the suggested names
        session.form_mut().origin = "MADRID".to_string();
        session.form_mut().destination = "NEW YORK".to_string();
        session.form_mut().trip_type = ROUND_TRIP.to_string();
        session.form_mut().departure_date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        session.form_mut().return_date = NaiveDate::from_ymd_opt(2025, 9, 14);
        session.form_mut().travel_class = TravelClass::PremiumEconomy;
        assert!(session.can_search());

        let rendered = session.search().await.unwrap();
        let offers: Vec<_> = rendered.offers().collect();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].legs[0].label, "Outbound");
        assert_eq!(offers[0].legs[1].label, "Return");
        assert_eq!(offers[0].legs[1].path, "JFK → LIS → MAD");
        assert_eq!(offers[0].price_label, "640.10 EUR");

        let searches = relay.searches();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].origin_code, "MAD");
        assert_eq!(searches[0].destination_code, "NYC");
        assert_eq!(searches[0].return_date.as_deref(), Some("2025-09-14"));
        assert_eq!(searches[0].travel_class, TravelClass::PremiumEconomy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_search_shows_no_results() {
        let relay = relay();
        let mut session = SearchSession::with_quiet_period(relay.clone(), QUIET);

        session.input_origin("Madrid");
        session.input_destination("New");
        settle().await;
        session.form_mut().origin = "Madrid".to_string();
        session.form_mut().destination = "new york".to_string();

        relay.fail_next_requests(1);
        let rendered = session.search().await.unwrap();
        assert_eq!(rendered.items, vec![ResultItem::NoResults]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_free_text_location_is_rejected() {
        let relay = relay();
        let mut session = SearchSession::with_quiet_period(relay.clone(), QUIET);

        session.input_origin("Madrid");
        session.input_destination("Gotham");
        settle().await;
        session.form_mut().origin = "MADRID".to_string();

        let result = session.search().await;
        assert_eq!(
            result,
            Err(SearchError::UnresolvedLocation {
                field: LocationField::Destination,
                input: "Gotham".to_string(),
            })
        );
        assert!(relay.searches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_keeps_suggestions() {
        let relay = relay();
        let mut session = SearchSession::with_quiet_period(relay, QUIET);

        session.input_origin("Madrid");
        settle().await;
        session.reset();

        assert!(session.form().origin.is_empty());
        assert_eq!(session.form().trip_type, "one-way");
        assert_eq!(session.form().adults, "1");
        assert_eq!(session.origin_options(), vec!["MADRID".to_string()]);
    }
}

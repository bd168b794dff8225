// Debounced location lookup for one of the search form's location inputs

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::debounce::DebounceTimer;
use crate::relay_client::RelayClient;
use crate::suggest_cache::{LocationField, SuggestCache};

// How long input has to stay unchanged before the lookup is sent
pub const AUTOSUGGEST_QUIET_PERIOD: Duration = Duration::from_millis(3000);

/// Options offered under a location input, in the order the relay returned
/// them. Cloning shares the same list.
#[derive(Debug, Clone, Default)]
pub struct SelectionList {
    options: Arc<RwLock<Vec<String>>>,
}

impl SelectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> Vec<String> {
        self.options.read().clone()
    }

    pub fn len(&self) -> usize {
        self.options.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.read().is_empty()
    }

    fn replace(&self, options: Vec<String>) {
        *self.options.write() = options;
    }
}

pub struct AutosuggestController<C: RelayClient> {
    field: LocationField,
    client: Arc<C>,
    cache: SuggestCache,
    options: SelectionList,
    quiet_period: Duration,
    timer: DebounceTimer,
}

impl<C: RelayClient> AutosuggestController<C> {
    pub fn new(field: LocationField, client: Arc<C>, cache: SuggestCache) -> Self {
        Self {
            field,
            client,
            cache,
            options: SelectionList::new(),
            quiet_period: AUTOSUGGEST_QUIET_PERIOD,
            timer: DebounceTimer::new(),
        }
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    pub fn field(&self) -> LocationField {
        self.field
    }

    pub fn cache(&self) -> &SuggestCache {
        &self.cache
    }

    pub fn options(&self) -> &SelectionList {
        &self.options
    }

    pub fn has_pending_lookup(&self) -> bool {
        self.timer.is_pending()
    }

    /// Called on every change of the field's text. Replaces any lookup still
    /// waiting for the quiet period with one for `value`.
    ///
    /// Empty and whitespace-only values are looked up too.
    pub fn schedule_lookup(&mut self, value: &str) {
        let field = self.field;
        let client = self.client.clone();
        let cache = self.cache.clone();
        let options = self.options.clone();
        let keyword = value.to_string();

        debug!("Scheduling {} lookup for {:?}", field, keyword);
        self.timer.schedule(self.quiet_period, async move {
            run_lookup(field, client.as_ref(), &keyword, &cache, &options).await;
        });
    }
}

/// Fetches suggestions for `keyword` and applies them: the selection list is
/// replaced, the cache is extended. On failure neither is touched.
///
/// Returns whether the lookup succeeded.
pub async fn run_lookup<C: RelayClient + ?Sized>(
    field: LocationField,
    client: &C,
    keyword: &str,
    cache: &SuggestCache,
    options: &SelectionList,
) -> bool {
    match client.autocomplete(keyword).await {
        Ok(suggestions) => {
            debug!(
                "{} lookup for {:?} returned {} suggestions",
                field,
                keyword,
                suggestions.len()
            );
            cache.extend(&suggestions);
            options.replace(
                suggestions
                    .into_iter()
                    .map(|suggestion| suggestion.display_name)
                    .collect(),
            );
            true
        }
        Err(e) => {
            warn!("{} lookup for {:?} failed: {}", field, keyword, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::LocationSuggestion;
    use crate::relay_client::mock_relay::MockRelay;

    fn paris_suggestions() -> Vec<LocationSuggestion> {
        vec![
            LocationSuggestion::new("PARIS", "PAR"),
            LocationSuggestion::new("PARIS LE PECQ", "XXA"),
        ]
    }

    fn controller(relay: &Arc<MockRelay>) -> AutosuggestController<MockRelay> {
        AutosuggestController::new(LocationField::Origin, relay.clone(), SuggestCache::new())
    }

    async fn settle(duration: Duration) {
        tokio::time::sleep(duration).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_coalesces_into_one_lookup() {
        let relay = Arc::new(MockRelay::new());
        relay.add_suggestions("pari", paris_suggestions());
        let mut controller = controller(&relay);

        for value in ["p", "pa", "par", "pari"] {
            controller.schedule_lookup(value);
            settle(Duration::from_millis(500)).await;
        }
        assert!(relay.keywords().is_empty());
        assert!(controller.has_pending_lookup());

        settle(AUTOSUGGEST_QUIET_PERIOD).await;

        assert_eq!(relay.keywords(), vec!["pari".to_string()]);
        assert_eq!(
            controller.options().options(),
            vec!["PARIS".to_string(), "PARIS LE PECQ".to_string()]
        );
        assert_eq!(controller.cache().resolve("Paris"), Some("PAR".to_string()));
        assert_eq!(
            controller.cache().resolve("paris le pecq"),
            Some("XXA".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_pauses_trigger_separate_lookups() {
        let relay = Arc::new(MockRelay::new());
        let mut controller = controller(&relay);

        controller.schedule_lookup("lon");
        settle(AUTOSUGGEST_QUIET_PERIOD + Duration::from_millis(10)).await;
        controller.schedule_lookup("lond");
        settle(AUTOSUGGEST_QUIET_PERIOD + Duration::from_millis(10)).await;

        assert_eq!(
            relay.keywords(),
            vec!["lon".to_string(), "lond".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_lookup_is_not_cancelled() {
        let relay = Arc::new(MockRelay::new());
        relay.set_delay(1000);
        relay.add_suggestions("par", paris_suggestions());
        let mut controller = controller(&relay);

        controller.schedule_lookup("par");
        settle(AUTOSUGGEST_QUIET_PERIOD + Duration::from_millis(10)).await;
        // "par" is now waiting on the relay
        controller.schedule_lookup("pari");
        settle(Duration::from_millis(1500)).await;

        assert_eq!(relay.keywords(), vec!["par".to_string()]);
        assert_eq!(controller.options().len(), 2);
        assert_eq!(controller.cache().resolve("paris"), Some("PAR".to_string()));

        settle(AUTOSUGGEST_QUIET_PERIOD + Duration::from_millis(1000)).await;
        assert_eq!(
            relay.keywords(),
            vec!["par".to_string(), "pari".to_string()]
        );
        // The later lookup returned nothing and replaced the list wholesale
        assert!(controller.options().is_empty());
        // while the cache kept what it had
        assert_eq!(controller.cache().resolve("paris"), Some("PAR".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_still_looked_up() {
        let relay = Arc::new(MockRelay::new());
        let mut controller = controller(&relay);

        controller.schedule_lookup("   ");
        settle(AUTOSUGGEST_QUIET_PERIOD + Duration::from_millis(10)).await;

        assert_eq!(relay.keywords(), vec!["   ".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_quiet_period() {
        let relay = Arc::new(MockRelay::new());
        let mut controller = controller(&relay).with_quiet_period(Duration::from_millis(200));

        controller.schedule_lookup("rome");
        settle(Duration::from_millis(250)).await;

        assert_eq!(relay.keywords(), vec!["rome".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_lookup_changes_nothing() {
        let relay = MockRelay::new();
        relay.add_suggestions("par", paris_suggestions());
        relay.add_suggestions("lis", vec![LocationSuggestion::new("LISBON", "LIS")]);

        let cache = SuggestCache::new();
        let options = SelectionList::new();

        assert!(run_lookup(LocationField::Origin, &relay, "par", &cache, &options).await);

        relay.fail_next_requests(1);
        assert!(!run_lookup(LocationField::Origin, &relay, "lis", &cache, &options).await);

        assert_eq!(
            options.options(),
            vec!["PARIS".to_string(), "PARIS LE PECQ".to_string()]
        );
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.resolve("lisbon"), None);
    }

    #[tokio::test]
    async fn test_lookups_extend_cache_and_replace_options() {
        let relay = MockRelay::new();
        relay.add_suggestions("par", paris_suggestions());
        relay.add_suggestions("lis", vec![LocationSuggestion::new("LISBON", "LIS")]);

        let cache = SuggestCache::new();
        let options = SelectionList::new();

        run_lookup(LocationField::Destination, &relay, "par", &cache, &options).await;
        run_lookup(LocationField::Destination, &relay, "lis", &cache, &options).await;

        assert_eq!(options.options(), vec!["LISBON".to_string()]);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.resolve("paris"), Some("PAR".to_string()));
        assert_eq!(cache.resolve("lisbon"), Some("LIS".to_string()));
    }
}

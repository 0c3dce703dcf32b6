//! State machine driving postcode input, lookups, and schedule fetches.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::model::{Address, CollectionEvent};
use crate::ports::{AddressLookup, ProviderError, ScheduleSource};
use crate::postcode;
use crate::store::SelectionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Where the resolution flow currently is.
pub enum Phase {
    /// Nothing selected, nothing in flight.
    #[default]
    Idle,
    /// Address lookup in flight.
    SearchingAddresses,
    /// At least one candidate to pick from.
    AddressesFound,
    /// Address lookup failed; retryable.
    SearchError,
    /// Schedule fetch in flight for the selected address.
    LoadingSchedule,
    /// Schedule loaded; an empty list is still a ready state.
    ScheduleReady,
    /// Schedule fetch failed; retryable.
    ScheduleError,
}

#[derive(Debug, Clone, Default)]
/// Snapshot of everything the presentation layer needs to render.
pub struct ViewState {
    /// Current position in the state machine.
    pub phase: Phase,
    /// Postcode text as typed.
    pub postcode: String,
    /// Candidate addresses from the last successful lookup.
    pub candidates: Vec<Address>,
    /// The address whose schedule is shown.
    pub selected: Option<Address>,
    /// Collection events in server order.
    pub schedule: Vec<CollectionEvent>,
    /// Human-readable message for the last failure.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
/// Behavior switches for the controller.
pub struct ControllerConfig {
    /// Search as the user types (debounced) instead of waiting for an
    /// explicit search request.
    pub auto_search: bool,
    /// Quiet period before typed input triggers a lookup.
    pub debounce: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            auto_search: true,
            debounce: Duration::from_millis(300),
        }
    }
}

#[derive(Clone)]
/// Drives postcode input through lookup, selection, and schedule retrieval.
///
/// All methods are non-blocking; network work runs on spawned tasks and
/// every state change is published through a watch channel. The controller
/// never touches rendering; the shell subscribes and calls the `on_*`
/// methods. Clones share the same underlying state.
pub struct ResolutionController {
    inner: Arc<Inner>,
}

/// Whether a schedule fetch should also write the selection to storage.
///
/// User picks persist; re-fetching an already stored selection does not.
enum Persist {
    No,
    Pick { searched: Option<String> },
}

struct Inner {
    config: ControllerConfig,
    lookup: Arc<dyn AddressLookup>,
    schedules: Arc<dyn ScheduleSource>,
    store: SelectionStore,
    state: watch::Sender<ViewState>,
    // Generation counters; a task only applies its result while it is
    // still the newest of its kind.
    search_generation: AtomicU64,
    schedule_generation: AtomicU64,
    pending_search: Mutex<Option<JoinHandle<()>>>,
}

impl ResolutionController {
    /// Create a controller over the given backends and persistence.
    #[must_use]
    pub fn new(
        lookup: Arc<dyn AddressLookup>,
        schedules: Arc<dyn ScheduleSource>,
        store: SelectionStore,
        config: ControllerConfig,
    ) -> Self {
        let (state, receiver) = watch::channel(ViewState::default());
        drop(receiver);
        Self {
            inner: Arc::new(Inner {
                config,
                lookup,
                schedules,
                store,
                state,
                search_generation: AtomicU64::new(0),
                schedule_generation: AtomicU64::new(0),
                pending_search: Mutex::new(None),
            }),
        }
    }

    /// Subscribe to state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Restore the persisted selection and fetch its schedule.
    ///
    /// When a previous run saved an address the controller goes straight
    /// to `LoadingSchedule`, bypassing address search entirely.
    pub async fn init(&self) {
        if let Some(remembered) = self.inner.store.load_postcode().await {
            self.inner.state.send_modify(|view| {
                view.postcode.clear();
                view.postcode.push_str(&remembered);
            });
        }

        let Some(address) = self.inner.store.load().await else {
            return;
        };
        self.inner.state.send_modify(|view| {
            view.selected = Some(address.clone());
            view.phase = Phase::LoadingSchedule;
            view.error = None;
        });
        self.inner.spawn_schedule_fetch(address, Persist::No);
    }

    /// Record new postcode input and debounce the follow-up lookup.
    pub fn on_postcode_changed(&self, text: &str) {
        let text = text.to_owned();
        self.inner.state.send_modify(|view| {
            view.postcode.clear();
            view.postcode.push_str(&text);
        });

        if !self.inner.config.auto_search {
            return;
        }

        // New input supersedes whatever the previous keystroke started,
        // whether still waiting out the debounce or already on the wire.
        self.inner.abort_pending_search();

        let inner = Arc::clone(&self.inner);
        let debounce = self.inner.config.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            inner.debounced_input(&text).await;
        });
        self.inner.keep_pending_search(handle);
    }

    /// Validate the current input and search immediately, no debounce.
    ///
    /// This is the explicit-search variant; empty and invalid input get a
    /// validation message instead of the silent wait the debounced path
    /// uses.
    pub fn search_now(&self) {
        self.inner.abort_pending_search();
        let text = self.inner.state.borrow().postcode.clone();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            self.inner.state.send_modify(|view| {
                view.phase = Phase::SearchError;
                view.error = Some(ProviderError::EmptyPostcode.to_string());
            });
            return;
        }
        if !postcode::is_valid(trimmed) {
            self.inner.state.send_modify(|view| {
                view.phase = Phase::SearchError;
                view.error = Some(ProviderError::InvalidPostcode.to_string());
            });
            return;
        }

        let normalized = postcode::normalize(trimmed);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            inner.run_search(&normalized).await;
        });
        self.inner.keep_pending_search(handle);
    }

    /// Persist the pick and load its collection schedule.
    ///
    /// A schedule response that arrives after a newer pick is discarded.
    pub fn on_address_picked(&self, address: Address) {
        self.inner.abort_pending_search();

        let searched = postcode::normalize(&self.inner.state.borrow().postcode);
        self.inner.state.send_modify(|view| {
            view.selected = Some(address.clone());
            view.phase = Phase::LoadingSchedule;
            view.candidates.clear();
            view.postcode.clear();
            view.schedule.clear();
            view.error = None;
        });

        let searched = Some(searched).filter(|value| !value.is_empty());
        self.inner.spawn_schedule_fetch(address, Persist::Pick { searched });
    }

    /// Forget the on-screen selection and return to postcode entry.
    ///
    /// Persisted storage is left alone; it is only ever overwritten by the
    /// next successful pick.
    pub fn change_address(&self) {
        self.inner.abort_pending_search();
        self.inner.search_generation.fetch_add(1, Ordering::SeqCst);
        self.inner.schedule_generation.fetch_add(1, Ordering::SeqCst);
        self.inner.state.send_modify(|view| {
            view.phase = Phase::Idle;
            view.candidates.clear();
            view.selected = None;
            view.schedule.clear();
            view.error = None;
        });
    }
}

impl Inner {
    fn abort_pending_search(&self) {
        if let Some(handle) = self
            .pending_search
            .lock()
            .expect("pending search lock")
            .take()
        {
            handle.abort();
        }
    }

    fn keep_pending_search(&self, handle: JoinHandle<()>) {
        *self.pending_search.lock().expect("pending search lock") = Some(handle);
    }

    /// Runs once the input has been quiet for the debounce interval.
    async fn debounced_input(&self, text: &str) {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            // Cleared input resets the whole flow; storage stays untouched.
            self.search_generation.fetch_add(1, Ordering::SeqCst);
            self.schedule_generation.fetch_add(1, Ordering::SeqCst);
            self.state.send_modify(|view| {
                view.phase = Phase::Idle;
                view.candidates.clear();
                view.selected = None;
                view.schedule.clear();
                view.error = None;
            });
            return;
        }

        if !postcode::is_valid(trimmed) {
            // Probably mid-typing: drop stale candidates, surface nothing.
            self.state.send_modify(|view| {
                view.candidates.clear();
                if matches!(
                    view.phase,
                    Phase::SearchingAddresses | Phase::AddressesFound | Phase::SearchError
                ) {
                    view.phase = Phase::Idle;
                    view.error = None;
                }
            });
            return;
        }

        self.run_search(&postcode::normalize(trimmed)).await;
    }

    async fn run_search(&self, normalized: &str) {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|view| {
            view.phase = Phase::SearchingAddresses;
            view.error = None;
        });

        tracing::debug!(postcode = %normalized, "dispatching address lookup");
        let result = self.lookup.lookup(normalized).await;

        if self.search_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(postcode = %normalized, "discarding stale address lookup");
            return;
        }

        match result {
            Ok(addresses) if addresses.is_empty() => self.state.send_modify(|view| {
                view.phase = Phase::SearchError;
                view.candidates.clear();
                view.error = Some("No addresses found for this postcode".to_owned());
            }),
            Ok(addresses) => self.state.send_modify(|view| {
                view.phase = Phase::AddressesFound;
                view.candidates = addresses;
                view.error = None;
            }),
            Err(err) => self.state.send_modify(|view| {
                view.phase = Phase::SearchError;
                view.candidates.clear();
                view.error = Some(err.to_string());
            }),
        }
    }

    /// Spawn a schedule fetch for `address`, tagged with a new generation.
    fn spawn_schedule_fetch(self: &Arc<Self>, address: Address, persist: Persist) {
        let generation = self.schedule_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            if let Persist::Pick { searched } = persist {
                inner.store.save(&address).await;
                if let Some(searched) = searched {
                    inner.store.save_postcode(&searched).await;
                }
            }

            tracing::debug!(uprn = %address.uprn, "dispatching schedule fetch");
            let result = inner.schedules.collections(&address.uprn).await;

            if inner.schedule_generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(uprn = %address.uprn, "discarding stale schedule response");
                return;
            }

            match result {
                Ok(events) => inner.state.send_modify(|view| {
                    view.phase = Phase::ScheduleReady;
                    view.schedule = events;
                    view.error = None;
                }),
                Err(err) => inner.state.send_modify(|view| {
                    view.phase = Phase::ScheduleError;
                    view.schedule.clear();
                    view.error = Some(err.to_string());
                }),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::model::Uprn;
    use crate::store::testing::MemoryPrefs;

    enum LookupOutcome {
        /// Return one address labeled with the queried postcode.
        Echo,
        Empty,
        Fail(String),
    }

    struct FakeLookup {
        calls: Mutex<Vec<String>>,
        delay: Duration,
        outcome: LookupOutcome,
    }

    impl FakeLookup {
        fn new(outcome: LookupOutcome) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                delay: Duration::ZERO,
                outcome,
            }
        }

        fn with_delay(outcome: LookupOutcome, delay: Duration) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                delay,
                outcome,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl AddressLookup for FakeLookup {
        async fn lookup(&self, postcode: &str) -> Result<Vec<Address>, ProviderError> {
            self.calls
                .lock()
                .expect("calls lock")
                .push(postcode.to_owned());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.outcome {
                LookupOutcome::Echo => Ok(vec![address(postcode)]),
                LookupOutcome::Empty => Ok(Vec::new()),
                LookupOutcome::Fail(message) => Err(ProviderError::NotFound(message.clone())),
            }
        }
    }

    struct ScheduleReply {
        delay: Duration,
        result: Result<Vec<CollectionEvent>, String>,
    }

    #[derive(Default)]
    struct FakeSchedules {
        calls: Mutex<Vec<String>>,
        plan: HashMap<String, ScheduleReply>,
    }

    impl FakeSchedules {
        fn reply(mut self, uprn: &str, delay: Duration, events: Vec<CollectionEvent>) -> Self {
            self.plan.insert(
                uprn.to_owned(),
                ScheduleReply {
                    delay,
                    result: Ok(events),
                },
            );
            self
        }

        fn fail(mut self, uprn: &str, message: &str) -> Self {
            self.plan.insert(
                uprn.to_owned(),
                ScheduleReply {
                    delay: Duration::ZERO,
                    result: Err(message.to_owned()),
                },
            );
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl ScheduleSource for FakeSchedules {
        async fn collections(&self, uprn: &Uprn) -> Result<Vec<CollectionEvent>, ProviderError> {
            self.calls.lock().expect("calls lock").push(uprn.0.clone());
            let reply = self.plan.get(&uprn.0).expect("unplanned uprn in test");
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            match &reply.result {
                Ok(events) => Ok(events.clone()),
                Err(message) => Err(ProviderError::NotFound(message.clone())),
            }
        }
    }

    fn address(uprn: &str) -> Address {
        Address {
            uprn: Uprn(uprn.to_owned()),
            short_address: uprn.to_owned(),
            latitude: None,
            longitude: None,
            northing: None,
            easting: None,
            site_id: None,
            account_site_id: None,
            usrn: None,
        }
    }

    fn event(service: &str) -> CollectionEvent {
        CollectionEvent {
            service: service.to_owned(),
            round: String::new(),
            schedule: String::new(),
            day: "Monday".to_owned(),
            date: "2025-03-17".to_owned(),
            read_date: None,
        }
    }

    fn controller(
        lookup: Arc<FakeLookup>,
        schedules: Arc<FakeSchedules>,
        prefs: Arc<MemoryPrefs>,
        config: ControllerConfig,
    ) -> ResolutionController {
        ResolutionController::new(
            lookup,
            schedules,
            SelectionStore::new(prefs),
            config,
        )
    }

    async fn wait_for_phase(receiver: &mut watch::Receiver<ViewState>, phase: Phase) -> ViewState {
        tokio::time::timeout(Duration::from_secs(30), async {
            loop {
                {
                    let view = receiver.borrow_and_update().clone();
                    if view.phase == phase {
                        return view;
                    }
                }
                receiver.changed().await.expect("controller dropped");
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {phase:?}"))
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_a_single_lookup() {
        let lookup = Arc::new(FakeLookup::new(LookupOutcome::Echo));
        let schedules = Arc::new(FakeSchedules::default());
        let resolver = controller(
            Arc::clone(&lookup),
            schedules,
            Arc::new(MemoryPrefs::default()),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_postcode_changed("RG3");
        resolver.on_postcode_changed("RG30 1");
        resolver.on_postcode_changed("RG30 1DB");

        let view = wait_for_phase(&mut receiver, Phase::AddressesFound).await;
        assert_eq!(lookup.calls(), vec!["RG301DB".to_owned()]);
        assert_eq!(view.candidates.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cleared_input_returns_to_idle() {
        let lookup = Arc::new(FakeLookup::new(LookupOutcome::Echo));
        let resolver = controller(
            lookup,
            Arc::new(FakeSchedules::default()),
            Arc::new(MemoryPrefs::default()),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_postcode_changed("RG30 1DB");
        wait_for_phase(&mut receiver, Phase::AddressesFound).await;

        resolver.on_postcode_changed("");
        let view = wait_for_phase(&mut receiver, Phase::Idle).await;
        assert!(view.candidates.is_empty());
        assert!(view.schedule.is_empty());
        assert_eq!(view.selected, None);
        assert_eq!(view.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_input_clears_candidates_without_error() {
        let lookup = Arc::new(FakeLookup::new(LookupOutcome::Echo));
        let resolver = controller(
            Arc::clone(&lookup),
            Arc::new(FakeSchedules::default()),
            Arc::new(MemoryPrefs::default()),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_postcode_changed("RG30 1DB");
        wait_for_phase(&mut receiver, Phase::AddressesFound).await;

        resolver.on_postcode_changed("RG30 1DBX");
        let view = wait_for_phase(&mut receiver, Phase::Idle).await;
        assert!(view.candidates.is_empty());
        assert_eq!(view.error, None);
        // No second request went out for the invalid input.
        assert_eq!(lookup.calls(), vec!["RG301DB".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_lookup_result_is_a_search_error() {
        let resolver = controller(
            Arc::new(FakeLookup::new(LookupOutcome::Empty)),
            Arc::new(FakeSchedules::default()),
            Arc::new(MemoryPrefs::default()),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_postcode_changed("RG30 1DB");
        let view = wait_for_phase(&mut receiver, Phase::SearchError).await;
        assert!(view.candidates.is_empty());
        assert_eq!(
            view.error.as_deref(),
            Some("No addresses found for this postcode")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_failure_surfaces_its_message() {
        let resolver = controller(
            Arc::new(FakeLookup::new(LookupOutcome::Fail(
                "No addresses found for this postcode".to_owned(),
            ))),
            Arc::new(FakeSchedules::default()),
            Arc::new(MemoryPrefs::default()),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_postcode_changed("RG30 1DB");
        let view = wait_for_phase(&mut receiver, Phase::SearchError).await;
        assert_eq!(
            view.error.as_deref(),
            Some("No addresses found for this postcode")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retyping_supersedes_an_in_flight_search() {
        let lookup = Arc::new(FakeLookup::with_delay(
            LookupOutcome::Echo,
            Duration::from_millis(200),
        ));
        let resolver = controller(
            Arc::clone(&lookup),
            Arc::new(FakeSchedules::default()),
            Arc::new(MemoryPrefs::default()),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_postcode_changed("RG30 1DB");
        // Let the debounce fire and the first request get on the wire.
        tokio::time::sleep(Duration::from_millis(310)).await;
        assert_eq!(lookup.calls(), vec!["RG301DB".to_owned()]);

        resolver.on_postcode_changed("EC1A 1BB");
        let view = wait_for_phase(&mut receiver, Phase::AddressesFound).await;
        assert_eq!(view.candidates[0].short_address, "EC1A1BB");
        assert_eq!(
            lookup.calls(),
            vec!["RG301DB".to_owned(), "EC1A1BB".to_owned()]
        );

        // The superseded response must never surface, no matter how late.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(resolver.state().candidates[0].short_address, "EC1A1BB");
    }

    #[tokio::test(start_paused = true)]
    async fn newest_pick_wins_over_a_slow_schedule_fetch() {
        let schedules = Arc::new(
            FakeSchedules::default()
                .reply(
                    "1001",
                    Duration::from_millis(500),
                    vec![event("Food Waste Collection Service")],
                )
                .reply(
                    "1002",
                    Duration::from_millis(10),
                    vec![event("Recycling Collection Service")],
                ),
        );
        let resolver = controller(
            Arc::new(FakeLookup::new(LookupOutcome::Echo)),
            Arc::clone(&schedules),
            Arc::new(MemoryPrefs::default()),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_address_picked(address("1001"));
        resolver.on_address_picked(address("1002"));

        let view = wait_for_phase(&mut receiver, Phase::ScheduleReady).await;
        assert_eq!(view.selected, Some(address("1002")));
        assert_eq!(view.schedule[0].service, "Recycling Collection Service");

        // Let the slow fetch for the first pick resolve; it must be dropped.
        tokio::time::sleep(Duration::from_millis(600)).await;
        let settled = resolver.state();
        assert_eq!(settled.phase, Phase::ScheduleReady);
        assert_eq!(settled.schedule[0].service, "Recycling Collection Service");
        assert_eq!(schedules.calls(), vec!["1001".to_owned(), "1002".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_failure_clears_the_schedule() {
        let schedules = Arc::new(
            FakeSchedules::default().fail("1001", "No collection data found for this address"),
        );
        let resolver = controller(
            Arc::new(FakeLookup::new(LookupOutcome::Echo)),
            schedules,
            Arc::new(MemoryPrefs::default()),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_address_picked(address("1001"));
        let view = wait_for_phase(&mut receiver, Phase::ScheduleError).await;
        assert!(view.schedule.is_empty());
        assert_eq!(
            view.error.as_deref(),
            Some("No collection data found for this address")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn init_restores_saved_selection_and_skips_search() {
        let prefs = Arc::new(MemoryPrefs::default());
        let saved = address("1001");
        SelectionStore::new(Arc::clone(&prefs) as Arc<dyn crate::ports::PreferenceStore>)
            .save(&saved)
            .await;

        let lookup = Arc::new(FakeLookup::new(LookupOutcome::Echo));
        let schedules = Arc::new(FakeSchedules::default().reply(
            "1001",
            Duration::ZERO,
            vec![event("Garden Waste Collection Service")],
        ));
        let resolver = controller(
            Arc::clone(&lookup),
            schedules,
            prefs,
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.init().await;
        let view = wait_for_phase(&mut receiver, Phase::ScheduleReady).await;
        assert_eq!(view.selected, Some(saved));
        assert_eq!(view.schedule[0].service, "Garden Waste Collection Service");
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn change_address_resets_view_but_keeps_storage() {
        let prefs = Arc::new(MemoryPrefs::default());
        let schedules = Arc::new(FakeSchedules::default().reply(
            "1001",
            Duration::ZERO,
            vec![event("Recycling Collection Service")],
        ));
        let resolver = controller(
            Arc::new(FakeLookup::new(LookupOutcome::Echo)),
            schedules,
            Arc::clone(&prefs),
            ControllerConfig::default(),
        );
        let mut receiver = resolver.subscribe();

        resolver.on_address_picked(address("1001"));
        wait_for_phase(&mut receiver, Phase::ScheduleReady).await;

        resolver.change_address();
        let view = wait_for_phase(&mut receiver, Phase::Idle).await;
        assert_eq!(view.selected, None);
        assert!(view.schedule.is_empty());

        let store = SelectionStore::new(prefs);
        assert_eq!(store.load().await, Some(address("1001")));
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_search_validates_before_dispatch() {
        let lookup = Arc::new(FakeLookup::new(LookupOutcome::Echo));
        let resolver = controller(
            Arc::clone(&lookup),
            Arc::new(FakeSchedules::default()),
            Arc::new(MemoryPrefs::default()),
            ControllerConfig {
                auto_search: false,
                ..ControllerConfig::default()
            },
        );
        let mut receiver = resolver.subscribe();

        resolver.search_now();
        let view = wait_for_phase(&mut receiver, Phase::SearchError).await;
        assert_eq!(view.error.as_deref(), Some("Please enter a postcode"));

        resolver.on_postcode_changed("nope");
        resolver.search_now();
        let view = wait_for_phase(&mut receiver, Phase::SearchError).await;
        assert_eq!(
            view.error.as_deref(),
            Some("Please enter a valid UK postcode")
        );
        assert!(lookup.calls().is_empty());

        resolver.on_postcode_changed("RG30 1DB");
        resolver.search_now();
        let view = wait_for_phase(&mut receiver, Phase::AddressesFound).await;
        assert_eq!(view.candidates.len(), 1);
        assert_eq!(lookup.calls(), vec!["RG301DB".to_owned()]);
    }
}

// TestDependencies - mock implementations for testing
//
// Provides in-memory collaborators that can be injected into the lunch
// orchestrator for tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slack::SlackMessage;

use super::{BaseClock, BaseNotifier, BaseRosterStore, ServerDeps};
use crate::common::ParticipantId;
use crate::domains::lunch::models::{EventKey, GroupAssignment};

// =============================================================================
// In-memory Roster Store
// =============================================================================

/// Number of calls made to each store method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCallCounts {
    pub get_members: usize,
    pub add_member: usize,
    pub remove_member: usize,
    pub get_assignment: usize,
    pub save_assignment_if_absent: usize,
}

#[derive(Default)]
struct Counters {
    get_members: AtomicUsize,
    add_member: AtomicUsize,
    remove_member: AtomicUsize,
    get_assignment: AtomicUsize,
    save_assignment_if_absent: AtomicUsize,
}

#[derive(Default)]
pub struct InMemoryRosterStore {
    rosters: Mutex<HashMap<EventKey, BTreeSet<ParticipantId>>>,
    assignments: Mutex<HashMap<EventKey, GroupAssignment>>,
    counters: Counters,
    unavailable: AtomicBool,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the roster of an event
    pub fn with_members<I, S>(self, key: EventKey, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ParticipantId>,
    {
        self.rosters
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Pre-store an assignment, as if the event had been published
    pub fn with_assignment(self, key: EventKey, assignment: GroupAssignment) -> Self {
        self.assignments.lock().unwrap().insert(key, assignment);
        self
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn members(&self, key: EventKey) -> BTreeSet<ParticipantId> {
        self.rosters
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn assignment(&self, key: EventKey) -> Option<GroupAssignment> {
        self.assignments.lock().unwrap().get(&key).cloned()
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.lock().unwrap().len()
    }

    pub fn call_counts(&self) -> StoreCallCounts {
        StoreCallCounts {
            get_members: self.counters.get_members.load(Ordering::SeqCst),
            add_member: self.counters.add_member.load(Ordering::SeqCst),
            remove_member: self.counters.remove_member.load(Ordering::SeqCst),
            get_assignment: self.counters.get_assignment.load(Ordering::SeqCst),
            save_assignment_if_absent: self
                .counters
                .save_assignment_if_absent
                .load(Ordering::SeqCst),
        }
    }

    fn record(&self, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow!("roster store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRosterStore for InMemoryRosterStore {
    async fn get_members(&self, key: EventKey) -> Result<BTreeSet<ParticipantId>> {
        self.record(&self.counters.get_members)?;
        Ok(self.members(key))
    }

    async fn add_member(&self, key: EventKey, id: &ParticipantId) -> Result<()> {
        self.record(&self.counters.add_member)?;
        self.rosters
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .insert(id.clone());
        Ok(())
    }

    async fn remove_member(&self, key: EventKey, id: &ParticipantId) -> Result<()> {
        self.record(&self.counters.remove_member)?;
        if let Some(roster) = self.rosters.lock().unwrap().get_mut(&key) {
            roster.remove(id);
        }
        Ok(())
    }

    async fn get_assignment(&self, key: EventKey) -> Result<Option<GroupAssignment>> {
        self.record(&self.counters.get_assignment)?;
        Ok(self.assignment(key))
    }

    async fn save_assignment_if_absent(
        &self,
        key: EventKey,
        assignment: &GroupAssignment,
    ) -> Result<bool> {
        self.record(&self.counters.save_assignment_if_absent)?;
        let mut assignments = self.assignments.lock().unwrap();
        if assignments.contains_key(&key) {
            return Ok(false);
        }
        assignments.insert(key, assignment.clone());
        Ok(true)
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

/// A message captured by the mock notifier
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub destination: String,
    pub message: SlackMessage,
}

#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<SentMessage>>,
    failing: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send attempt fail (attempts are still recorded)
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All messages, including failed attempts
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_message(&self) -> Option<SlackMessage> {
        self.sent.lock().unwrap().last().map(|s| s.message.clone())
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn send(&self, destination: &str, message: &SlackMessage) -> Result<()> {
        self.sent.lock().unwrap().push(SentMessage {
            destination: destination.to_string(),
            message: message.clone(),
        });

        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("notification channel unavailable"));
        }
        Ok(())
    }
}

// =============================================================================
// Fixed Clock
// =============================================================================

/// Clock that only moves when told to
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl BaseClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub roster_store: Arc<InMemoryRosterStore>,
    pub notifier: Arc<MockNotifier>,
    pub clock: Arc<FixedClock>,
}

impl TestDependencies {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            roster_store: Arc::new(InMemoryRosterStore::new()),
            notifier: Arc::new(MockNotifier::new()),
            clock: Arc::new(FixedClock::new(now)),
        }
    }

    /// Set a pre-populated roster store
    pub fn mock_store(mut self, store: InMemoryRosterStore) -> Self {
        self.roster_store = Arc::new(store);
        self
    }

    /// Set a mock notifier
    pub fn mock_notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Convert into ServerDeps, keeping handles to the mocks for assertions
    pub fn deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.roster_store.clone(),
            self.notifier.clone(),
            self.clock.clone(),
        )
    }
}

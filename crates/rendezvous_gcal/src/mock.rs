// --- File: crates/rendezvous_gcal/src/mock.rs ---
//! In-memory [`CalendarService`] used by tests in this and dependent crates.

use crate::interval::parse_timestamp;
use crate::service::GcalServiceError;
use chrono::{DateTime, Utc};
use rendezvous_common::services::{
    BoxFuture, CalendarEntry, CalendarEvent, CalendarEventResult, CalendarService, Transparency,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Delete,
}

#[derive(Default)]
pub struct InMemoryCalendar {
    events: Mutex<HashMap<String, Vec<CalendarEntry>>>,
    pending_failures: Mutex<HashMap<Operation, usize>>,
    calls: Mutex<HashMap<Operation, usize>>,
    latency: Mutex<Option<Duration>>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event as if it had been entered on the provider calendar.
    pub fn seed(&self, calendar_id: &str, summary: &str, start: &str, end: &str) -> String {
        let event_id = new_event_id();
        self.lock_events()
            .entry(calendar_id.to_string())
            .or_default()
            .push(CalendarEntry {
                event_id: event_id.clone(),
                summary: summary.to_string(),
                description: None,
                start_time: start.to_string(),
                end_time: end.to_string(),
                transparency: Transparency::Opaque,
                reference: None,
            });
        event_id
    }

    /// All events of a calendar, ordered by start.
    pub fn entries(&self, calendar_id: &str) -> Vec<CalendarEntry> {
        let mut entries = self
            .lock_events()
            .get(calendar_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by_key(|e| parse_timestamp(&e.start_time).ok());
        entries
    }

    /// Makes the next `count` calls of `operation` fail with a transient error.
    pub fn fail_next(&self, operation: Operation, count: usize) {
        *lock(&self.pending_failures).entry(operation).or_default() += count;
    }

    /// Delays every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.latency) = Some(latency);
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        lock(&self.calls).get(&operation).copied().unwrap_or_default()
    }

    fn lock_events(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<CalendarEntry>>> {
        lock(&self.events)
    }

    async fn enter(&self, operation: Operation) -> Result<(), GcalServiceError> {
        *lock(&self.calls).entry(operation).or_default() += 1;
        let latency = *lock(&self.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let mut failures = lock(&self.pending_failures);
        if let Some(remaining) = failures.get_mut(&operation) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(GcalServiceError::Unavailable(format!(
                    "injected {:?} failure",
                    operation
                )));
            }
        }
        Ok(())
    }
}

impl CalendarService for InMemoryCalendar {
    type Error = GcalServiceError;

    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEntry>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            self.enter(Operation::List).await?;
            let entries = self
                .entries(&calendar_id)
                .into_iter()
                .filter(|entry| {
                    match (
                        parse_timestamp(&entry.start_time),
                        parse_timestamp(&entry.end_time),
                    ) {
                        (Ok(start), Ok(end)) => start < end_time && end > start_time,
                        // Malformed entries are returned so callers see them.
                        _ => true,
                    }
                })
                .collect();
            Ok(entries)
        })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            self.enter(Operation::Create).await?;
            let event_id = new_event_id();
            self.lock_events()
                .entry(calendar_id)
                .or_default()
                .push(CalendarEntry {
                    event_id: event_id.clone(),
                    summary: event.summary,
                    description: event.description,
                    start_time: event.start_time,
                    end_time: event.end_time,
                    transparency: event.transparency,
                    reference: event.reference,
                });
            Ok(CalendarEventResult {
                event_id,
                status: "confirmed".to_string(),
            })
        })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        Box::pin(async move {
            self.enter(Operation::Delete).await?;
            if let Some(entries) = self.lock_events().get_mut(&calendar_id) {
                entries.retain(|e| e.event_id != event_id);
            }
            Ok(())
        })
    }
}

fn new_event_id() -> String {
    format!("mock-event-{}", uuid::Uuid::new_v4())
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//! Scan capture service.
//!
//! Owns one [`ScanMachine`] per account behind a single mutex and runs
//! the countdown clock. Exactly one countdown task exists per running
//! capture: the task is spawned on the preview-to-counting transition
//! and exits the first time a tick reports the countdown is gone.
//! Completed captures are written through a [`ScanSink`] so tests can
//! observe persistence without a database.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::Mutex;

use raritone_core::{DeviceClass, ScanRecord, ScanRecordId, UserId};

use crate::db::{RepositoryError, ScanRepository};

use super::machine::{ScanEvent, ScanMachine, ScanPhase, StreamGuard, TickOutcome};

/// Destination for completed scan records.
pub trait ScanSink: Send + Sync + 'static {
    /// Write one completed record.
    fn persist(
        &self,
        record: ScanRecord,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Sink writing records to the scan table.
#[derive(Clone)]
pub struct PgScanSink {
    pool: PgPool,
}

impl PgScanSink {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ScanSink for PgScanSink {
    async fn persist(&self, record: ScanRecord) -> Result<(), RepositoryError> {
        ScanRepository::new(&self.pool).insert(&record).await
    }
}

/// Status payload returned to the scan page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatus {
    /// Current phase name.
    pub phase: &'static str,
    /// Ticks left, while counting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
    /// Stream refusal or persistence failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_error: Option<String>,
}

impl ScanStatus {
    fn of(machine: &ScanMachine) -> Self {
        let remaining = match machine.phase() {
            ScanPhase::Counting { remaining } => Some(*remaining),
            _ => None,
        };
        Self {
            phase: machine.phase().as_str(),
            remaining,
            media_error: machine.media_error().map(str::to_owned),
        }
    }
}

/// Capture coordinator for all accounts.
pub struct ScanService<S> {
    machines: Mutex<HashMap<UserId, ScanMachine>>,
    sink: S,
    tick_interval: Duration,
}

impl<S: ScanSink> ScanService<S> {
    /// Create a service ticking once per second.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::with_tick_interval(sink, Duration::from_secs(1))
    }

    /// Create a service with a custom tick interval.
    #[must_use]
    pub fn with_tick_interval(sink: S, tick_interval: Duration) -> Self {
        Self {
            machines: Mutex::new(HashMap::new()),
            sink,
            tick_interval,
        }
    }

    /// Apply a client-reported event to an account's capture.
    ///
    /// Spawns the countdown task when the event starts a countdown.
    pub async fn handle_event(
        self: &Arc<Self>,
        user_id: &UserId,
        event: ScanEvent,
        device: DeviceClass,
    ) -> ScanStatus {
        let mut machines = self.machines.lock().await;
        let machine = machines.entry(user_id.clone()).or_default();
        let was_counting = matches!(machine.phase(), ScanPhase::Counting { .. });

        match event {
            ScanEvent::Start => machine.start(),
            ScanEvent::StreamGranted => {
                let id = user_id.clone();
                machine.grant(StreamGuard::new(move || {
                    tracing::debug!(user_id = %id, "Media stream released");
                }));
            }
            ScanEvent::StreamDenied { reason } => machine.deny(reason),
            ScanEvent::Cancel => machine.cancel(),
        }

        let status = ScanStatus::of(machine);
        let now_counting = matches!(machine.phase(), ScanPhase::Counting { .. });

        // Drop settled machines so the map is bounded by active
        // captures, not by every account that ever opened the page
        if machine.is_settled() {
            machines.remove(user_id);
        }
        drop(machines);

        if now_counting && !was_counting {
            let service = Arc::clone(self);
            let id = user_id.clone();
            tokio::spawn(async move {
                service.run_countdown(id, device).await;
            });
        }

        status
    }

    /// Current status for an account. Accounts with no capture are idle.
    pub async fn status(&self, user_id: &UserId) -> ScanStatus {
        let machines = self.machines.lock().await;
        machines.get(user_id).map_or(
            ScanStatus {
                phase: ScanPhase::Idle.as_str(),
                remaining: None,
                media_error: None,
            },
            ScanStatus::of,
        )
    }

    async fn run_countdown(self: Arc<Self>, user_id: UserId, device: DeviceClass) {
        loop {
            tokio::time::sleep(self.tick_interval).await;

            let outcome = {
                let mut machines = self.machines.lock().await;
                match machines.get_mut(&user_id) {
                    Some(machine) => machine.tick(),
                    None => TickOutcome::Ignored,
                }
            };

            match outcome {
                TickOutcome::Continue { .. } => {}
                TickOutcome::Completed => {
                    self.finish_capture(&user_id, device).await;
                    return;
                }
                TickOutcome::Ignored => return,
            }
        }
    }

    /// Build and persist the completed record, then settle the machine.
    ///
    /// The capture step extracts no measurements, so the record carries
    /// no height, weight, or image.
    async fn finish_capture(&self, user_id: &UserId, device: DeviceClass) {
        let record = ScanRecord {
            id: ScanRecordId::new(uuid::Uuid::new_v4().to_string()),
            user_id: user_id.clone(),
            scan_id: format!("SCAN-{}", Utc::now().timestamp_millis()),
            height: None,
            weight: None,
            image_url: None,
            scan_time: Utc::now(),
            device,
            try_on_count: 0,
        };

        let result = self.sink.persist(record).await;

        let mut machines = self.machines.lock().await;
        if let Some(machine) = machines.get_mut(user_id) {
            match result {
                Ok(()) => {
                    tracing::info!(user_id = %user_id, "Scan record persisted");
                    machine.persisted();
                }
                Err(error) => {
                    tracing::error!(user_id = %user_id, %error, "Scan record write failed");
                    machine.persist_failed(error.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        records: StdMutex<Vec<ScanRecord>>,
    }

    impl ScanSink for Arc<RecordingSink> {
        async fn persist(&self, record: ScanRecord) -> Result<(), RepositoryError> {
            self.records.lock().unwrap().push(record);
            Ok(())
        }
    }

    struct FailingSink;

    impl ScanSink for FailingSink {
        async fn persist(&self, _record: ScanRecord) -> Result<(), RepositoryError> {
            Err(RepositoryError::DataCorruption("write refused".into()))
        }
    }

    fn user() -> UserId {
        UserId::new("user-1")
    }

    async fn enter_counting<S: ScanSink>(service: &Arc<ScanService<S>>) {
        service
            .handle_event(&user(), ScanEvent::Start, DeviceClass::Desktop)
            .await;
        service
            .handle_event(&user(), ScanEvent::StreamGranted, DeviceClass::Desktop)
            .await;
        let status = service
            .handle_event(&user(), ScanEvent::Start, DeviceClass::Desktop)
            .await;
        assert_eq!(status.phase, "counting");
        assert_eq!(status.remaining, Some(30));
    }

    #[tokio::test(start_paused = true)]
    async fn full_countdown_persists_exactly_one_bare_record() {
        let sink = Arc::new(RecordingSink::default());
        let service = Arc::new(ScanService::new(Arc::clone(&sink)));

        enter_counting(&service).await;
        tokio::time::sleep(Duration::from_secs(35)).await;

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].height.is_none());
        assert!(records[0].weight.is_none());
        assert!(records[0].image_url.is_none());
        assert!(records[0].scan_id.starts_with("SCAN-"));
        assert_eq!(records[0].device, DeviceClass::Desktop);
        drop(records);

        let status = service.status(&user()).await;
        assert_eq!(status.phase, "preview");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_countdown_persists_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let service = Arc::new(ScanService::new(Arc::clone(&sink)));

        enter_counting(&service).await;
        tokio::time::sleep(Duration::from_secs(15)).await;

        let status = service
            .handle_event(&user(), ScanEvent::Cancel, DeviceClass::Desktop)
            .await;
        assert_eq!(status.phase, "idle");

        // Let the countdown task observe the cancellation and exit
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(sink.records.lock().unwrap().is_empty());
        assert_eq!(service.status(&user()).await.phase, "idle");
    }

    #[tokio::test(start_paused = true)]
    async fn denied_stream_reports_media_error() {
        let sink = Arc::new(RecordingSink::default());
        let service = Arc::new(ScanService::new(Arc::clone(&sink)));

        service
            .handle_event(&user(), ScanEvent::Start, DeviceClass::Mobile)
            .await;
        let status = service
            .handle_event(
                &user(),
                ScanEvent::StreamDenied {
                    reason: "NotAllowedError".into(),
                },
                DeviceClass::Mobile,
            )
            .await;

        assert_eq!(status.phase, "idle");
        assert_eq!(status.media_error.as_deref(), Some("NotAllowedError"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_persist_surfaces_on_status() {
        let service = Arc::new(ScanService::new(FailingSink));

        enter_counting(&service).await;
        tokio::time::sleep(Duration::from_secs(35)).await;

        let status = service.status(&user()).await;
        assert_eq!(status.phase, "preview");
        assert_eq!(status.media_error.as_deref(), Some("write refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn settled_machines_are_dropped_from_the_map() {
        let sink = Arc::new(RecordingSink::default());
        let service = Arc::new(ScanService::new(Arc::clone(&sink)));

        enter_counting(&service).await;
        assert_eq!(service.machines.lock().await.len(), 1);

        service
            .handle_event(&user(), ScanEvent::Cancel, DeviceClass::Desktop)
            .await;
        assert!(service.machines.lock().await.is_empty());

        // A refused acquisition settles and is dropped the same way
        service
            .handle_event(&user(), ScanEvent::Start, DeviceClass::Desktop)
            .await;
        service
            .handle_event(
                &user(),
                ScanEvent::StreamDenied {
                    reason: "NotAllowedError".into(),
                },
                DeviceClass::Desktop,
            )
            .await;
        assert!(service.machines.lock().await.is_empty());

        // Holding a stream in preview is live state and stays
        service
            .handle_event(&user(), ScanEvent::Start, DeviceClass::Desktop)
            .await;
        service
            .handle_event(&user(), ScanEvent::StreamGranted, DeviceClass::Desktop)
            .await;
        assert_eq!(service.machines.lock().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_account_status_is_idle() {
        let sink = Arc::new(RecordingSink::default());
        let service = Arc::new(ScanService::new(sink));
        assert_eq!(service.status(&user()).await.phase, "idle");
    }
}

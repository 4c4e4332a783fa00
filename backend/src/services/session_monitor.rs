//! Client-side session lifecycle monitor.
//!
//! Keeps a long-lived, already-authorized page in sync with the backend: it
//! checks for a live session as soon as it starts and then every
//! [`CHECK_INTERVAL`], and sends the page to the login screen the first time
//! the backend says there is no session. A failed check is logged and retried
//! at the next interval; it never signs the user out on its own.
//!
//! Interaction events (pointer, key, scroll, touch) only move the
//! last-activity timestamp. Inactivity alone does not sign anyone out.
//!
//! Periodic checks and activity events are multiplexed on a single task, so
//! they interleave but never run concurrently. [`SessionMonitor::start`] can
//! succeed once per monitor; the returned [`MonitorHandle`] cancels the timer
//! and the activity listener when stopped or dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use adapters::{Credentials, SessionBackend};
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::auth::LOGIN_PATH;

pub const CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Locally cached session marker (the browser-side copy of the session).
pub trait LocalSessionStore: Send + Sync {
    fn clear(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    PointerDown,
    KeyDown,
    Scroll,
    TouchStart,
}

impl ActivityEvent {
    pub const ALL: [ActivityEvent; 4] = [
        ActivityEvent::PointerDown,
        ActivityEvent::KeyDown,
        ActivityEvent::Scroll,
        ActivityEvent::TouchStart,
    ];

    /// DOM event name the listener is registered under.
    pub fn dom_event(self) -> &'static str {
        match self {
            ActivityEvent::PointerDown => "mousedown",
            ActivityEvent::KeyDown => "keydown",
            ActivityEvent::Scroll => "scroll",
            ActivityEvent::TouchStart => "touchstart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    LoggedOut,
    Stopped,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<MonitorState>,
    last_activity: Mutex<Option<Instant>>,
}

impl Shared {
    /// Returns `false` if the monitor already reached a terminal state
    /// (`LoggedOut` or `Stopped`), which is then left untouched.
    fn set_state(&self, next: MonitorState) -> bool {
        let mut state = self.state.lock();
        if matches!(*state, MonitorState::LoggedOut | MonitorState::Stopped) {
            return false;
        }
        *state = next;
        true
    }

    fn touch(&self, now: Instant) {
        let mut last = self.last_activity.lock();
        *last = Some(match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }
}

pub struct SessionMonitor {
    backend: Arc<dyn SessionBackend>,
    credentials: Credentials,
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn LocalSessionStore>,
    interval: Duration,
    started: AtomicBool,
    shared: Arc<Shared>,
}

impl SessionMonitor {
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        credentials: Credentials,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn LocalSessionStore>,
    ) -> Self {
        Self {
            backend,
            credentials,
            navigator,
            store,
            interval: CHECK_INTERVAL,
            started: AtomicBool::new(false),
            shared: Arc::new(Shared {
                state: Mutex::new(MonitorState::Idle),
                last_activity: Mutex::new(None),
            }),
        }
    }

    /// Start monitoring on the current tokio runtime. Returns `None` if this
    /// monitor was already started; the first call's handle stays in charge.
    pub fn start(&self) -> Option<MonitorHandle> {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("session monitor already started, ignoring");
            return None;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (activity_tx, activity_rx) = mpsc::unbounded_channel();

        let task = MonitorTask {
            backend: Arc::clone(&self.backend),
            credentials: self.credentials.clone(),
            navigator: Arc::clone(&self.navigator),
            store: Arc::clone(&self.store),
            interval: self.interval,
            shared: Arc::clone(&self.shared),
        };

        self.shared.set_state(MonitorState::Running);
        let join = tokio::spawn(task.run(shutdown_rx, activity_rx));

        Some(MonitorHandle {
            shutdown: shutdown_tx,
            activity: ActivityTracker { tx: activity_tx },
            join,
            shared: Arc::clone(&self.shared),
        })
    }

    pub fn state(&self) -> MonitorState {
        *self.shared.state.lock()
    }

    pub fn last_activity(&self) -> Option<Instant> {
        *self.shared.last_activity.lock()
    }

    /// Time since the last recorded activity, if any was recorded.
    pub fn idle_for(&self) -> Option<Duration> {
        self.last_activity().map(|at| Instant::now().saturating_duration_since(at))
    }
}

/// Sink for interaction events. Cheap to clone; one per listener.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    tx: mpsc::UnboundedSender<ActivityEvent>,
}

impl ActivityTracker {
    /// Returns `false` once the monitor has stopped listening.
    pub fn record(&self, event: ActivityEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Disposer for a started monitor. Dropping it has the same effect as
/// [`MonitorHandle::stop`].
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    activity: ActivityTracker,
    join: JoinHandle<()>,
    shared: Arc<Shared>,
}

impl MonitorHandle {
    pub fn activity(&self) -> ActivityTracker {
        self.activity.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancels the pending check and the activity listener. Teardown lives in
    /// `Drop`.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        // Stopped first, so an in-flight check can no longer sign out.
        self.shared.set_state(MonitorState::Stopped);
        let _ = self.shutdown.send(true);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckOutcome {
    Live,
    SignedOut,
    Failed,
}

struct MonitorTask {
    backend: Arc<dyn SessionBackend>,
    credentials: Credentials,
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn LocalSessionStore>,
    interval: Duration,
    shared: Arc<Shared>,
}

impl MonitorTask {
    async fn run(
        self,
        mut shutdown: watch::Receiver<bool>,
        mut activity: mpsc::UnboundedReceiver<ActivityEvent>,
    ) {
        info!(interval = ?self.interval, "starting session monitor");

        // First tick completes immediately: that is the start-up check.
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    let outcome = tokio::select! {
                        biased;
                        _ = shutdown.changed() => None,
                        outcome = self.check() => Some(outcome),
                    };
                    match outcome {
                        None => break,
                        Some(CheckOutcome::SignedOut) => {
                            self.sign_out();
                            return;
                        }
                        Some(CheckOutcome::Live) | Some(CheckOutcome::Failed) => {}
                    }
                }
                Some(event) = activity.recv() => {
                    debug!(event = event.dom_event(), "activity");
                    self.shared.touch(Instant::now());
                }
            }
        }

        debug!("session monitor stopped");
        self.shared.set_state(MonitorState::Stopped);
    }

    async fn check(&self) -> CheckOutcome {
        match self.backend.get_session(&self.credentials).await {
            Ok(Some(session)) if !session.is_expired_at(Utc::now()) => {
                // A confirmed session counts as activity.
                self.shared.touch(Instant::now());
                debug!(user_id = %session.user_id, "session still live");
                CheckOutcome::Live
            }
            Ok(_) => CheckOutcome::SignedOut,
            Err(err) if err.is_transient() => {
                warn!(error = %err, "session check failed, retrying next interval");
                CheckOutcome::Failed
            }
            Err(err) => {
                error!(error = %err, "session check rejected, retrying next interval");
                CheckOutcome::Failed
            }
        }
    }

    fn sign_out(&self) {
        if !self.shared.set_state(MonitorState::LoggedOut) {
            debug!("session monitor already stopped, not signing out");
            return;
        }
        info!("session gone, redirecting to login");
        self.store.clear();
        self.navigator.navigate(LOGIN_PATH);
    }
}

/// Navigator that records every navigation. Useful wherever there is no real
/// page to move, such as headless clients and tests.
#[derive(Debug, Default)]
pub struct NavigationLog {
    visited: Mutex<Vec<String>>,
}

impl NavigationLog {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().clone()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, path: &str) {
        self.visited.lock().push(path.to_string());
    }
}

/// In-memory stand-in for the browser's cached session marker.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    marker: Mutex<Option<String>>,
    clears: Mutex<usize>,
}

impl MemorySessionStore {
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self { marker: Mutex::new(Some(marker.into())), clears: Mutex::new(0) }
    }

    pub fn marker(&self) -> Option<String> {
        self.marker.lock().clone()
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock()
    }
}

impl LocalSessionStore for MemorySessionStore {
    fn clear(&self) {
        *self.marker.lock() = None;
        *self.clears.lock() += 1;
    }
}

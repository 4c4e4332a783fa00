//! Module for long-running services.
//!
//! Currently the session monitor, which keeps a client page's view of its
//! session in step with the backend.

pub mod session_monitor;

pub use session_monitor::{
    ActivityEvent, ActivityTracker, LocalSessionStore, MemorySessionStore, MonitorHandle,
    MonitorState, NavigationLog, Navigator, SessionMonitor, CHECK_INTERVAL,
};

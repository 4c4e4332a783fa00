//! Data structures for the access-control flow.
//!
//! Defines the resolved caller identity, the fixed redirect destinations and
//! the path classes the route guard works with, plus the path tables that
//! feed them.

use adapters::Role;
use serde::Serialize;
use uuid::Uuid;

pub const LOGIN_PATH: &str = "/auth/login";
pub const ADMIN_PREFIX: &str = "/admin";
pub const DASHBOARD_PREFIX: &str = "/dashboard";
pub const API_PREFIX: &str = "/api";

/// Reachable without a session.
pub const PUBLIC_PATHS: &[&str] = &[
    "/",
    LOGIN_PATH,
    "/auth/register",
    "/auth/registration-success",
    "/auth/pending-approval",
];

/// Platform-reserved asset paths; never guarded.
pub const RESERVED_PREFIXES: &[&str] = &["/_next", "/favicon.ico"];

/// Who is making the request, as far as the guard cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Login,
    Admin,
    Dashboard,
}

impl Destination {
    pub fn path(self) -> &'static str {
        match self {
            Destination::Login => LOGIN_PATH,
            Destination::Admin => ADMIN_PREFIX,
            Destination::Dashboard => DASHBOARD_PREFIX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Forward,
    Redirect(Destination),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Reserved,
    Public,
    Api,
    Protected,
}

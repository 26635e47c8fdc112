//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages own form state and call into the session store; routing decisions
//! live in `components::route_guard`.

pub mod dashboard;
pub mod login;
pub mod register;

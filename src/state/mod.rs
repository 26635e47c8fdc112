//! Client-side session state.
//!
//! DESIGN
//! ======
//! `session` is the pure state machine, `credentials` the persisted cache it
//! resolves from, and `store` the owned handle that ties both to the network.

pub mod credentials;
pub mod session;
pub mod store;

//! Decision logic for the building platform, kept free of any HTTP or
//! rendering concerns so it can be evaluated (and tested) in isolation.
//! The `web` crate consumes this crate and translates its decisions into
//! actual responses; consumers never need to know how locations are parsed.

pub mod auth_callback;
pub mod error;

pub use auth_callback::{AuthCallbackRouter, Location, RoutingDecision, TokenBundle, TokenType};

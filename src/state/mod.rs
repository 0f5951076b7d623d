//! Client-side session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` holds token presence, identity and the resolution flag; `auth`
//! drives the transitions (startup resolution, login, logout).

pub mod auth;
pub mod session;

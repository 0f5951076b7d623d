//! Admin panel client: session state, route guarding and the view layer
//! over the user-management API.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_helpers;

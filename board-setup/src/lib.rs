//! Setup wizard for National Rail departure boards.
//!
//! Collects a Darwin API token, a home station and optional destinations,
//! checks them against the live service, and stores the result as a
//! configuration entry. Existing entries can later have their stations
//! changed through the options editor.

pub mod config;
pub mod darwin;
pub mod domain;
pub mod flow;
pub mod store;
pub mod web;

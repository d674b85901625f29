//! Test utilities for the onboarding services.
//!
//! Provides the contract fixture loader and `httpmock` helpers standing in for the data
//! store, identity service and email API. Use from `dev-dependencies` only.

pub mod fixture;
pub mod rest;

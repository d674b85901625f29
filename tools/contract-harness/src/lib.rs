//! Replays the golden HTTP fixtures under `contracts/http/` against a running deployment.

pub mod fixture;
pub mod reporter;
pub mod runner;

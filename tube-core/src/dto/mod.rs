//! Data Transfer Objects
//!
//! Wire representations exchanged with the orchestrator. Kept apart from the
//! domain types because their JSON shape is fixed by the orchestrator.

pub mod resource;

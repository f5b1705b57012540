//! Core domain types
//!
//! The pipeline aggregate and the pieces it is built from. These types are
//! shared between the assembler (which builds them) and the CLI (which writes
//! them out and reconciles webhooks from them).

pub mod job;
pub mod pipeline;
pub mod resource;
pub mod webhook;

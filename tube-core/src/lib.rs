//! Tube Core
//!
//! Core types and pipeline assembly for the Tube pipeline builder.
//!
//! This crate contains:
//! - Domain types: the pipeline aggregate, jobs, resources, webhooks
//! - DTOs: the resource protocol's wire types
//! - Assembly: folding job contributors into one pipeline

pub mod assembler;
pub mod domain;
pub mod dto;
pub mod error;

pub use error::{PipelineError, Result};

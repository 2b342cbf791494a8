//! Application layer
//!
//! Use cases that orchestrate domain services into application workflows.
//! Each use case owns its command and response DTOs.

pub mod invoice;

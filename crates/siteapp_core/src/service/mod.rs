//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Turn raw form input into validated model values.
//! - Keep the web layer decoupled from storage details.

pub mod account_service;
pub mod person_service;
pub mod username;

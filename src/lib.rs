//! helpdesk - a support ticket service for CRM deployments
//!
//! This crate provides the ticket module of a customer relationship suite:
//! - Ticket lifecycle: create, reply, close, archive, delete
//! - Client/team separation with per-client visibility
//! - Event timeline with per-user unread tracking
//! - Queued email notifications delivered over SMTP
//! - Tags, pinning, categories and custom ticket fields
//!
//! The binary wraps the service in a small CLI (`migrate`, `seed`,
//! `serve`); everything else is reachable through the HTTP layer in
//! [`web`].

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Repository and handler modules repeat their domain noun by nature
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod files;
pub mod mail;
pub mod storage;
pub mod templates;
pub mod validation;
pub mod web;

// Re-export commonly used types
pub use error::{HelpdeskError, Result};

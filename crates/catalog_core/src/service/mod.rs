//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep admin/CLI layers decoupled from storage details.

pub mod author_service;
pub mod book_service;
pub mod loan_service;

//! Complaint Triage
//!
//! Banking-complaint intake and triage:
//! - Ingests complaint sheets (CSV) with customer details
//! - Classifies category, sentiment, urgency and priority with keyword rules
//!   and a lexicon sentiment score
//! - Persists classified complaints (SQLite)
//! - Answers operator questions through a rule-based chatbot
//! - Tracks ticket resolution and notifies customers
//!
//! PIPELINE:
//! UPLOAD → CLASSIFY → PERSIST → QUERY / RESOLVE → NOTIFY

pub mod api;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod error;
pub mod ingest;
pub mod keywords;
pub mod models;
pub mod notify;
pub mod report;
pub mod responder;
pub mod sentiment;
pub mod service;
pub mod store;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::ComplaintClassifier;
pub use keywords::KeywordConfig;
pub use responder::{QueryResponder, ResponderResult};
pub use service::TriageService;

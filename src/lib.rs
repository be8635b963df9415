//! Match Analysis Workflow Client
//!
//! This library drives the client side of a football match analysis backend:
//! it submits a match (team names, referees, optional video link and jersey
//! images) as one multipart request, polls the status endpoint until the
//! analysis reaches a terminal state, projects the returned report, and
//! fetches a natural-language score prediction either directly or through a
//! queue-based prediction service.

pub mod config;
pub mod models;
pub mod presenter;
pub mod services;
pub mod workflow;

//! Preference Compass - Adaptive Preference Elicitation
//!
//! This crate elicits a user's latent preferences over a small
//! multi-attribute decision (3 criteria, 3 levels each) through a sequence
//! of paired comparisons, maintaining a probabilistic belief per
//! attribute-level and adapting question generation to the current belief.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

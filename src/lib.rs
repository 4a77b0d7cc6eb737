//! Order Desk - Conversational order-taking backend.
//!
//! Takes free-form customer utterances and turns them into structured,
//! priced food orders through a multi-turn slot-filling dialogue.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Helpdesk client
//!
//! Client-side core of a customer-support widget and its content admin
//! page: a scripted-then-freeform chat engine and a content sync engine,
//! both talking to one remote JSON store.

pub mod cli;
pub mod config;
pub mod content;
pub mod conversation;
pub mod remote;
pub mod runtime;

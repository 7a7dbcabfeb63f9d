//! Live adapters backed by real network calls.

pub mod openai;

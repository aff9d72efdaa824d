#![forbid(unsafe_code)]

//! Domain model for the civics self-quiz: questions, flashcards, evaluations,
//! scoring and the persisted display preference.

pub mod model;
pub mod time;

pub use time::Clock;

//! The two-phase career survey: fixed questions, then adaptive follow-ups
//! generated from the first answers.

pub mod controller;
pub mod handlers;
pub mod machine;

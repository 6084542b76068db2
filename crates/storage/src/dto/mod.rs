pub mod common;
pub mod flight;
pub mod guess;
pub mod participant;
pub mod scoring;
pub mod tasting;
pub mod wine;

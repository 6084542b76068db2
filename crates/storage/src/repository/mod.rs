pub mod flight;
pub mod guess;
pub mod participant;
pub mod scoring_rule;
pub mod session;
pub mod tasting;
pub mod wine;

mod flight;
mod guess;
mod participant;
mod scoring_rule;
mod tasting;
mod user;
mod wine;

pub use flight::{Flight, FlightState};
pub use guess::Guess;
pub use participant::{Participant, ParticipantWithUser};
pub use scoring_rule::ScoringRule;
pub use tasting::{Tasting, TastingStatus, Visibility};
pub use user::User;
pub use wine::Wine;

pub mod flights;
pub mod guesses;
pub mod participants;
pub mod scoring;
pub mod tastings;
pub mod wines;

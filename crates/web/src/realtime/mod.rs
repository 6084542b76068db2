mod hub;
pub mod ws;

pub use hub::EventHub;

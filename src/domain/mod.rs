pub mod detection;
pub mod errors;
pub mod inference;
pub mod insight;

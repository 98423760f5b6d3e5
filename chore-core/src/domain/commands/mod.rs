pub mod settlement;
pub mod xp;

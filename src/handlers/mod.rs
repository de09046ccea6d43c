pub mod analysis;
pub mod auth;
pub mod health;
pub mod journal;
pub mod tts;

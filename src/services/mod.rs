pub mod groq;
pub mod recommendations;
pub mod tts;

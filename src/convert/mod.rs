//! Turning Hunspell `.aff`/`.dic` pairs into embeddable JavaScript.

pub mod artifact;
pub mod converter;
pub mod driver;
pub mod error;
pub mod locale;

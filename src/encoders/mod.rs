pub mod chunked;
pub mod errors;

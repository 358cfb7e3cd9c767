pub mod errors;
pub mod window;

pub mod news;
pub mod predict;
pub mod serve;

pub use news::news;
pub use predict::predict;
pub use serve::serve;

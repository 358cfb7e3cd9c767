pub mod health;
pub mod news;
pub mod predictions;
pub mod stocks;

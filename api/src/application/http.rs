pub mod health;
pub mod ingredient_analysis;
pub mod server;

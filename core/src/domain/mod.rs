pub mod allergy_profile;
pub mod authentication;
pub mod common;
pub mod health;
pub mod ingredient_analysis;

pub mod allergy_profile;
pub mod db;
pub mod health;
pub mod ingredient_analysis;
pub mod llm;

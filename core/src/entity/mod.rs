pub mod allergies;
pub mod families;
pub mod family_members;
pub mod scan_history;

pub mod analyze_ingredients;
pub mod get_scan;
pub mod get_scan_history;
pub mod quick_check;

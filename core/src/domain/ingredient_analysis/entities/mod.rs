pub mod quick_check;
pub mod scan_history;
pub mod verdict;

pub use quick_check::*;
pub use scan_history::*;
pub use verdict::*;

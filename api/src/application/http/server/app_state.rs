use std::sync::Arc;

use allersafe_core::application::AllerSafeService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: AllerSafeService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: AllerSafeService) -> Self {
        Self { args, service }
    }
}

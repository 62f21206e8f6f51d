use std::sync::Arc;

use crate::controllers::UserController;
use crate::domain::repositories::UserRepository;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: UserController,
}

impl AppState {
    /// Wires controllers around a single store handle
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            users: UserController::new(repository),
        }
    }
}

pub mod api;
pub mod cli;
pub mod errors;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;

pub use api::{resolve_base_url, ApiClient};
pub use errors::{AppError, AppResult};
pub use storage::{resolve_data_path, resolve_token_path};
pub use store::HabitStore;

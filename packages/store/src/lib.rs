pub mod actions;
pub mod config;
pub mod models;
pub mod reducer;

mod memory;
pub use memory::{ActionStream, AppStore, AuthStatusStream};

pub use actions::{Action, AuthActions};
pub use config::AppConfig;
pub use models::{AppState, AuthState};
pub use reducer::{get_auth_status, reduce};

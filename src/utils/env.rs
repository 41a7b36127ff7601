// src/utils/env.rs
use log::{debug, info};

/// Load variables from a `.env` file in the working directory (or a parent), if one exists.
/// Values already present in the process environment win.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment overrides from {}", path.display()),
        Err(e) => debug!("No .env file loaded ({}); using process environment only", e),
    }
}

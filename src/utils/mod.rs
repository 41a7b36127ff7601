pub mod config;
pub mod constants;
pub mod env;
pub mod progress_bars;
pub mod states;

pub async fn get_memory_usage() -> u64 {
    use sysinfo::System;
    let mut sys = System::new_all();
    sys.refresh_memory();
    sys.used_memory() / (1024 * 1024) // Convert to MB
}

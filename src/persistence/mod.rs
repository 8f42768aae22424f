pub mod config;
pub mod files;
pub mod storage;
pub mod store;
pub mod upgrade;

pub use config::{load_config_or_default, save_config, Config};
pub use files::{
    atomic_write, config_file, ensure_data_dir, get_data_dir, init_local_data_dir, log_file,
    read_file, report_file,
};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{load_board, save_board, LABELS_KEY, TASKS_KEY};

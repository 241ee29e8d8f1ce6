// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub mod commands;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    EXAMPLE_URL, handle_archive, init_logging, is_informational, parse_arguments, usage_example,
};

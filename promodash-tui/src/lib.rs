pub mod commands;
pub mod completion;
pub mod console;
pub mod help;
pub mod render;

pub use commands::dispatch;
pub use completion::TuiCompleter;
pub use console::ConsoleModule;

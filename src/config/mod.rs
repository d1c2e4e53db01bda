mod settings;

pub use settings::{LogConfig, LogFormat, PayloadConfig, Settings};

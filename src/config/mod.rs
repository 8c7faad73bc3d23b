mod settings;

pub use settings::{
    LLMConfig, LoggingConfig, ServerConfig, Settings, StorageBackend, StorageConfig,
};

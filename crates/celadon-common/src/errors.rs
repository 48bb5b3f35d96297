use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("empty channel name")]
    EmptyChannel,

    #[error("payload codec error: {0}")]
    Codec(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("invalid window options: {0}")]
    InvalidOptions(String),

    #[error("window is closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("mount directory not found: {0}")]
    MountNotFound(PathBuf),

    #[error("invalid mount name: {0}")]
    InvalidMountName(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CeladonError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

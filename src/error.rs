/// Errors raised at the edges of the bot: configuration and data loading.
///
/// The dialogue core never produces these; every user line gets a textual reply.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type AppResult<T> = Result<T, AppError>;

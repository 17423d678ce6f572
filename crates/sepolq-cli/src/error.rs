use sepolq_policy::PolicyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Argument 1: Directory that contains all of the sub-directories of SELinux polices to search.")]
    MissingDirectory,

    #[error("Argument 2: Pass the interface or domain name query.")]
    MissingQuery,

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::MissingQuery => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

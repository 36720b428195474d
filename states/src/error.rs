use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("State not found: {name}, context: {context}")]
    StateNotFound { name: &'static str, context: String },
    #[error("Compute not found: {name}, context: {context}")]
    ComputeNotFound { name: &'static str, context: String },
    #[error("Command not registered: {name}")]
    CommandNotFound { name: &'static str },
}

impl Error {
    pub fn state_not_found<T>(context: impl Into<String>) -> Self {
        Self::StateNotFound {
            name: std::any::type_name::<T>(),
            context: context.into(),
        }
    }

    pub fn compute_not_found<T>(context: impl Into<String>) -> Self {
        Self::ComputeNotFound {
            name: std::any::type_name::<T>(),
            context: context.into(),
        }
    }

    pub fn command_not_found<T>() -> Self {
        Self::CommandNotFound {
            name: std::any::type_name::<T>(),
        }
    }
}

use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    NotFound,
    AlreadyExists,
    Referenced,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Entity not found"),
            KernelError::AlreadyExists => write!(f, "Entity already exists"),
            KernelError::Referenced => write!(f, "Entity is still referenced"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("Compilation failed with {errors} error(s) and {warnings} warning(s)")]
    Failed { errors: usize, warnings: usize },
}

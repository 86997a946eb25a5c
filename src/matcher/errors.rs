use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("pattern is not valid text for this width: {message}")]
    InvalidPatternText { message: String },

    #[error("pattern syntax error: {message}")]
    Syntax { message: String },
}

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("buffer is not valid text for this width: {message}")]
    InvalidText { message: String },

    #[error("match execution failed: {message}")]
    Runtime { message: String },
}

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("bad argument")]
    BadArg,
    #[error("not found")]
    NotFound,
    #[error("not a directory")]
    NotDirectory,
    #[error("is a directory")]
    IsDirectory,
    #[error("invalid FAT16 format: {0}")]
    InvalidFormat(&'static str),
    #[error("out of range")]
    OutOfRange,
    #[error("allocation would exceed volume limits")]
    NoMemory,
    #[error("invalid seek")]
    Invalid,
    #[error("end of stream")]
    EndOfStream,
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(error) => error,
            other => io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

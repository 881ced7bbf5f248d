use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IoError {
    /// An input file could not be opened or read.
    Open(PathBuf, io::Error),
    /// A result file could not be written.
    Write(PathBuf, io::Error),
}

//! Appender implementations

pub mod memory;
pub mod rotating_file;
pub mod tee;
pub mod writer;

pub use memory::MemoryWriter;
pub use rotating_file::{RotatingFileWriter, RotationPolicy};
pub use tee::Tee;
pub use writer::WriterAppender;

pub use crate::core::{Appender, Hook, SharedWriter};

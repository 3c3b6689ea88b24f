pub mod record;
pub mod convention;
pub mod entry;
pub mod convert;
pub mod error;
pub mod stream;
pub mod sink;
pub mod noop_sink;
pub mod env;

#[cfg(feature = "cli")]
pub mod init;

pub use convention::Convention;
pub use convert::Converter;
pub use error::ConvertError;
pub use stream::{copy, ConvertedLines, CopyStats, OutputLine};

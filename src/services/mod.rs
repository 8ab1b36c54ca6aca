//! Service layer separating file I/O and format handling from business logic

mod format;
mod io;

pub use format::OutputFormatHandler;
pub use io::ImageIoService;

//! Photo library: where finished renders are saved.

pub mod writer;

pub use writer::{report_outcome, DirectoryLibrary, ImageLibraryWriter, SaveTicket, SavedImage};

pub mod summary;

pub use summary::{MtfSample, ProfileSample, PsfSummary};

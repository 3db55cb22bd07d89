pub mod locks;
pub mod server;
pub mod upload;

pub use locks::LeagueLocks;
pub use server::ServerService;
pub use upload::{commit_upload, CommitRequest, CommitSummary};

mod entry;
mod store;

pub use entry::Session;
pub use store::{SessionStore, SESSION_TTL};

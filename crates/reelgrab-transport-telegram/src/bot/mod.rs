/// Command definitions and handlers
pub mod handlers;
/// Outgoing replies and their delivery
pub mod reply;

pub use handlers::Command;
pub use reply::Reply;

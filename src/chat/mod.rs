/// Chat server core — codec, command parsing, registry, routing,
/// sessions, and the accept loop.
pub mod codec;
pub mod command;
pub mod log;
pub mod registry;
pub mod router;
pub mod server;
pub mod session;

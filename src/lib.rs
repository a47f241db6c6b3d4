//! tidepool — a small line-oriented TCP chat server.
//!
//! Clients connect, claim a unique nickname, then talk: plain lines are
//! broadcast to everyone, `@nick message` and `/w nick message` whisper
//! to one person, `/exit` leaves. Every event lands in an append-only
//! chat log mirrored to the console.

pub mod chat;

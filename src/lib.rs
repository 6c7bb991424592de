//! Neon Strike: a single-screen arcade shooter.
//!
//! All game rules live in this library. The binary only wires a terminal,
//! a keyboard/mouse reader and a frame clock around [`session::SessionController`].

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod spawner;

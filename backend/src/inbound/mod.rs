//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]. Other front ends (a desktop shell, a
//! CLI) drive the same ports directly.

pub mod http;

//! egui front end of the roster admin panel.

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod state;
pub mod widgets;

pub use app::RosterApp;

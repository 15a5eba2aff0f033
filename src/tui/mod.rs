//! Terminal user interface.

pub mod alert;
pub mod app;
pub mod command;
pub mod dialog;
pub mod event;
pub mod form;
pub mod input;
pub mod nav;
pub mod preview;
pub mod render;
pub mod state;
pub mod style;
pub mod table;
pub mod views;

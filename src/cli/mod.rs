pub mod directions;
pub mod setup;
pub mod ui;

pub mod ask;
pub mod cli;
pub mod ui;

pub mod app;
pub mod event;
pub mod keys;
pub mod ui;

pub use app::App;

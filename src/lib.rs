pub mod app;
pub mod command;
pub mod db;
pub mod error;
pub mod model;
pub mod realtime;
pub mod remote;
pub mod session;
pub mod store;

pub use app::{Carrinhos, Options};

pub mod config;
pub mod food;
pub mod session;
pub mod snake;
pub mod vector;

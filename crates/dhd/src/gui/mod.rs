pub mod app;
pub mod fault;
pub mod gate;
pub mod theme;
pub mod window;

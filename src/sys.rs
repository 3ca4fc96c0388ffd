pub mod geometry;
pub mod providers;
pub mod screen;
pub mod window;

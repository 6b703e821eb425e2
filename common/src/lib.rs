pub mod coordinate;
pub mod night;
pub mod proximity;
pub mod time;

pub use coordinate::Coordinate;

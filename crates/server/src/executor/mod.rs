mod piston;

pub use piston::PistonExecutor;

pub mod csv;
pub mod email;
pub mod time;

pub use time::*;

pub mod log;
pub mod play;
pub mod show;
pub mod suggest;

pub use log::*;
pub use play::*;
pub use show::*;
pub use suggest::*;

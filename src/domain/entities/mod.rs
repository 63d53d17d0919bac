mod draft;
mod draft_process;
mod player;
mod team;

pub use draft::*;
pub use draft_process::*;
pub use player::*;
pub use team::*;

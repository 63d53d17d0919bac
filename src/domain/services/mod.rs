mod captain_selection;
mod clock;
mod stats_service;

pub use captain_selection::*;
pub use clock::*;
pub use stats_service::*;

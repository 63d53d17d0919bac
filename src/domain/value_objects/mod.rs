mod caller;
mod draft_settings;
mod draft_timer;
mod interface;
mod section;
mod stats_row;
mod summary;

pub use caller::*;
pub use draft_settings::*;
pub use draft_timer::*;
pub use interface::*;
pub use section::*;
pub use stats_row::*;
pub use summary::*;

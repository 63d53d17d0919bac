mod add_sub;
mod adjust_score;
mod context;
mod finish_draft;
mod force_end;
mod force_sub;
mod get_draft;
mod join_draft;
mod leave_draft;
mod open_draft;
mod pick_player;
mod reassign_captain;
mod refresh_draft;
mod reping;
mod request_sub;
mod start_match;

pub use add_sub::*;
pub use adjust_score::*;
pub use context::*;
pub use finish_draft::*;
pub use force_end::*;
pub use force_sub::*;
pub use get_draft::*;
pub use join_draft::*;
pub use leave_draft::*;
pub use open_draft::*;
pub use pick_player::*;
pub use reassign_captain::*;
pub use refresh_draft::*;
pub use reping::*;
pub use request_sub::*;
pub use start_match::*;

mod draft_registry;
mod notifier;

pub use draft_registry::*;
pub use notifier::*;

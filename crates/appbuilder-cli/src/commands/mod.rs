mod chart;
mod inspect;
mod presets;
mod serve;
mod validate;

pub use chart::{generate, package};
pub use inspect::inspect;
pub use presets::presets;
pub use serve::serve;
pub use validate::validate;

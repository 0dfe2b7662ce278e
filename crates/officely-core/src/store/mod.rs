// ── State containers ──

mod container;
mod state;

pub use container::EntityStore;
pub use state::{Action, EntityState, reduce};

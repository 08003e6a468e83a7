mod event_handler;
mod pipeline;
mod session;
mod state;
#[cfg(test)]
mod test_support;

pub use session::{run_batch, run_interactive};
pub use state::{AppState, BackendEvent, TranslationUnit, UnitId, UnitStatus, UnitStore, UNIT_COUNT};

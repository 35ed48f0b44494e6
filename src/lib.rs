// Library surface for headless/integration tests and reuse.
// The terminal front-end in main.rs is only a consumer of this.
pub mod config;
pub mod controller;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod pseudocode;
pub mod runtime;
pub mod session;
pub mod util;

pub use config::VisualizerConfig;
pub use engine::Algorithm;
pub use error::{Error, Result};
pub use session::{Mode, RunState, Session, SessionState};

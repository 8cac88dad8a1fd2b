//! Client-side core of the room-design page: restores a signed-in session,
//! gates the "generate" action behind it, and drives the generation request.

pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod ui;
pub mod generators;

pub mod crypto {
    pub mod token;
}

pub mod models {
    pub mod session;
    pub mod generation;
}

pub mod repositories {
    pub mod session;
    pub mod style;
}

pub mod services {
    pub mod session;
    pub mod generation;
    pub mod style;
}

pub mod validation {
    pub mod generation;
    pub mod style;
}

pub use config::Config;
pub use error::{AppError, Result, ValidationError};
pub use models::generation::{GenerationInput, GenerationOutcome, TriggerResult};
pub use models::session::Session;
pub use state::AppContext;

mod errors;
mod lending_service;

pub use errors::{LendingError, Result};
pub use lending_service::{LendingService, ServiceDependencies};

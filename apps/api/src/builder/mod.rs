// CV/Résumé builder
// Session state machine, form store and the HTTP handlers that drive them.

pub mod handlers;
pub mod registry;
pub mod session;
pub mod store;
pub mod validation;

pub use registry::SessionRegistry;

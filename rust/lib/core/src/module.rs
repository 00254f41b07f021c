use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The server binary collects all modules and merges their routes into a
/// single Router. Routes are absolute (a module owns its `/api/...` prefix).
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes.
    fn routes(&self) -> Router;
}

use axum::Router;

/// A unit of the gateway that contributes HTTP routes.
///
/// The server binary collects every module and merges the routers
/// at the root; each module owns its absolute paths.
pub trait Module: Send + Sync {
    /// Module name, used for startup logging.
    fn name(&self) -> &str;

    /// The module's routes with state already applied.
    fn routes(&self) -> Router;
}

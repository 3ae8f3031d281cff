use pdfsift_core::Dispatcher;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub dispatcher: Dispatcher,
}

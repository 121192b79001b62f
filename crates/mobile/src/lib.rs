pub mod bridge;
pub mod listener;
pub(crate) mod logging;
pub mod session;
pub mod types;

uniffi::setup_scaffolding!();

/// Initialize the library with proper panic handling and logging
/// Call this once at startup from Kotlin/Swift
#[uniffi::export]
pub fn init_panic_handler() {
    logging::setup_logging();
}

use std::{panic::PanicHookInfo, sync::Once};

use tracing_subscriber::{
    filter::FilterFn, fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
};

fn ours(metadata: &tracing::Metadata<'_>) -> bool {
    metadata.module_path().unwrap_or_default().starts_with("pursuit")
}

pub(crate) fn setup_logging() {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| {
        install();
        std::panic::set_hook(Box::new(panic_hook));
    })
}

#[cfg(target_os = "android")]
fn install() {
    use tracing_logcat::{LogcatMakeWriter, LogcatTag};

    let tag = LogcatTag::Fixed("Pursuit-Rust".to_owned());
    let writer = match LogcatMakeWriter::new(tag) {
        Ok(writer) => writer,
        Err(error) => {
            eprintln!("failed to initialize logcat writer: {error}");
            return;
        }
    };
    let layer = tracing_subscriber::fmt::layer()
        .event_format(Format::default().with_level(false).without_time())
        .with_writer(writer)
        .with_ansi(false);
    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(FilterFn::new(ours))
        .try_init();
}

#[cfg(not(target_os = "android"))]
fn install() {
    let layer = tracing_subscriber::fmt::layer()
        .event_format(Format::default().without_time())
        .with_writer(std::io::stderr)
        .with_ansi(false);
    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(FilterFn::new(ours))
        .try_init();
}

fn panic_hook(info: &PanicHookInfo) {
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("{info}\n{backtrace}");
    eprintln!("=== RUST PANIC ===\n{info}\nBacktrace:\n{backtrace}\n=== END PANIC ===");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_is_repeatable() {
        setup_logging();
        setup_logging();
        tracing::info!("logging twice is fine");
    }
}

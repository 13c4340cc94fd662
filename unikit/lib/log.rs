use tracing_subscriber::{fmt, EnvFilter};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Initializes the tracing subscriber unikit tools use.
///
/// Filtering follows `RUST_LOG`; output is compact, without target or
/// thread annotations. Call once, at startup.
pub fn init_default_tracing() {
    fmt()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

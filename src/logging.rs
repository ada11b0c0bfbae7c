/// Install the global tracing subscriber, bridging `log::` macros (the
/// facade the library logs through) into tracing. Filter comes from
/// RUST_LOG, defaulting to info. Log lines go to stderr so stdout stays
/// reserved for run summaries and reports.
pub fn init_tracing_from_env() {
    let _ = tracing_log::LogTracer::init();
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

//! Cross-crate scenarios for the drape message bus.

#[cfg(test)]
mod bus_e2e;

#[cfg(test)]
mod pipeline;

#[cfg(test)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

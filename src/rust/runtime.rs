use std::io;

use tokio::runtime::{Builder, Runtime};

/// Sizing of the multi-threaded runtime that serves HTTP requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Worker threads; 0 lets tokio pick one per core
    pub worker_threads: usize,
}

pub fn create_runtime(config: &RuntimeConfig) -> io::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();

    if config.worker_threads > 0 {
        builder.worker_threads(config.worker_threads);
    }

    builder.thread_name("expense-worker").enable_all().build()
}

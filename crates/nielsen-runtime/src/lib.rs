use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

pub mod actor;

fn shared_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        Builder::new_multi_thread()
            .enable_all()
            .thread_name("nielsen-runtime")
            .build()
            .expect("failed to build shared tokio runtime")
    })
}

/// Spawns onto the tokio runtime the caller is running on, or onto the
/// shared runtime when called from plain threads.
///
/// Staying on the caller's runtime keeps actors and timers on the same clock
/// as the host, which is what lets paused-time tests drive them.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => handle.spawn(future),
        Err(_) => shared_runtime().spawn(future),
    }
}

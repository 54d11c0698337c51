use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;
use tracing::info_span;
use tracing::Instrument;

/// Spawns `task` on the current runtime inside a span named after `name`.
pub(crate) fn spawn_task<Fut>(
    name: &str,
    task: Fut,
) -> JoinHandle<()>
where
    Fut: Future<Output = ()> + Send + 'static,
{
    // Clone the name so it can be safely moved into the async block
    let name = name.to_string();
    let span = info_span!("task", name = %name);
    tokio::spawn(
        async move {
            task.await;
            debug!("spawned task: {name} stopped");
        }
        .instrument(span),
    )
}

use std::sync::Arc;

use tokio::sync::broadcast;

use adnauseam_core::{Config, TemplateBinding};
use adnauseam_store::{EtcdClient, Store};
use adnauseam_sync::{env, RenderPipeline};

use crate::error::{io_err, DaemonError};
use crate::retry::RetryPolicy;
use crate::supervisor::{Supervisor, SupervisorSignal};
use crate::watcher::Watcher;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub bindings: Vec<TemplateBinding>,
    pub command: Vec<String>,
    pub config: Config,
}

/// Start the runtime and block the current thread until interrupted.
pub fn start_blocking(options: RunOptions) -> Result<(), DaemonError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    let result = runtime.block_on(run(options));
    // An abandoned long-poll may still occupy a blocking thread.
    runtime.shutdown_background();
    result
}

/// Load every template, then watch the store until ctrl-c.
///
/// Template errors surface here, before any child is spawned.
pub async fn run(options: RunOptions) -> Result<(), DaemonError> {
    let RunOptions {
        bindings,
        command,
        config,
    } = options;

    let pipeline = RenderPipeline::load(&bindings)?;
    let mut supervisor = Supervisor::new(command, config.supervisor.stop_timeout())?;

    if config.seed_env {
        let seeded = env::seed_env(pipeline.index());
        tracing::debug!(seeded, "seeded environment keys");
    }

    let store = Arc::new(EtcdClient::new(&config.store));
    let policy = RetryPolicy::from_config(&config.retry);
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(16);

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("received ctrl-c, shutting down");
                    let _ = shutdown.send(());
                }
                Err(err) => tracing::warn!("ctrl-c handler failed: {err}"),
            }
        })
    };

    let result = watch_loop(store, &pipeline, &mut supervisor, policy, shutdown_rx).await;
    signal_handle.abort();

    let stopped = supervisor.shutdown();
    result?;
    stopped
}

/// Bootstrap, then render and signal the supervisor after every dispatched change.
///
/// Returns `Ok(())` once `shutdown` fires; an in-flight poll is abandoned.
pub async fn watch_loop<S: Store + 'static>(
    store: Arc<S>,
    pipeline: &RenderPipeline,
    supervisor: &mut Supervisor,
    policy: RetryPolicy,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let keys: Vec<&str> = pipeline.index().keys().collect();
    tracing::info!(url = store.base_url(), "watching keys {keys:?}");

    let mut watcher = Watcher::new(store, policy);
    tokio::select! {
        biased;
        _ = shutdown.recv() => return Ok(()),
        result = watcher.bootstrap(pipeline.index()) => {
            result?;
        }
    }
    render_and_signal(pipeline, supervisor)?;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => return Ok(()),
            result = watcher.next_change(pipeline.index()) => {
                let change = result?;
                tracing::debug!(
                    key = %change.key,
                    action = %change.action,
                    revision = change.revision,
                    cursor = watcher.cursor(),
                    "dispatched change"
                );
            }
        }
        render_and_signal(pipeline, supervisor)?;
    }
}

fn render_and_signal(
    pipeline: &RenderPipeline,
    supervisor: &mut Supervisor,
) -> Result<SupervisorSignal, DaemonError> {
    let round = pipeline.render()?;
    let signal = SupervisorSignal::for_round(&round);
    tracing::info!(
        rendered = round.rendered().len(),
        total = round.total(),
        %signal,
        "render round"
    );
    supervisor.handle(signal)?;
    Ok(signal)
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

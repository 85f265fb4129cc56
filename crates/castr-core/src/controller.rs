// ── Sync service ──
//
// Lifecycle of one account: builds the remote client, polls the
// live-stream collection, swaps in a new directory, republishes derived
// views, and runs the enable/disable commands. All rebuilds go through
// the publisher lock; background triggers go through a one-slot queue.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use castr_api::CastrClient;

use crate::command::{Command, CommandResult, EnableMode, PlatformOutcome};
use crate::config::SyncConfig;
use crate::error::CoreError;
use crate::host::{HostSurface, TemplateExpander, VariableExpander};
use crate::model::PlatformReference;
use crate::resolve::{self, ReferenceOptions, ResolvedTarget, Resolver};
use crate::status::{ConnectionStatus, PollState, StatusReport, StatusTracker};
use crate::store::{Directory, DirectoryStore, RebuildReport};
use crate::views::{VariableView, ViewPublisher};

// ── SyncService ──────────────────────────────────────────────────

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc<ServiceInner>`. Construct once per account,
/// call [`start()`](Self::start) to begin polling, and
/// [`shutdown()`](Self::shutdown) to tear everything down.
#[derive(Clone)]
pub struct SyncService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    config: ArcSwap<SyncConfig>,
    client: ArcSwap<CastrClient>,
    store: DirectoryStore,
    host: Arc<dyn HostSurface>,
    expander: Arc<dyn TemplateExpander>,
    /// Poll gate: held for the whole fetch → rebuild → publish sequence.
    publisher: Mutex<ViewPublisher>,
    status: StatusTracker,
    poll_state: watch::Sender<PollState>,
    variables: watch::Sender<Arc<VariableView>>,
    /// One-slot trigger queue; a full queue means a poll is already pending.
    refresh_tx: mpsc::Sender<()>,
    refresh_rx: Mutex<Option<mpsc::Receiver<()>>>,
    cancel: CancellationToken,
    /// Child token of the current timer, replaced on reconfiguration.
    timer_cancel: Mutex<CancellationToken>,
    timer_handle: Mutex<Option<JoinHandle<()>>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncService {
    /// Create a service whose tokens are expanded against its own
    /// published variables. Does NOT poll; call [`start()`](Self::start).
    pub fn new(config: SyncConfig, host: Arc<dyn HostSurface>) -> Result<Self, CoreError> {
        let (variables, rx) = watch::channel(Arc::new(VariableView::default()));
        let expander = Arc::new(VariableExpander::new(config.variable_namespace.clone(), rx));
        Self::build(config, host, expander, variables)
    }

    /// Create a service with a host-provided template expander.
    pub fn with_expander(
        config: SyncConfig,
        host: Arc<dyn HostSurface>,
        expander: Arc<dyn TemplateExpander>,
    ) -> Result<Self, CoreError> {
        let (variables, _) = watch::channel(Arc::new(VariableView::default()));
        Self::build(config, host, expander, variables)
    }

    fn build(
        config: SyncConfig,
        host: Arc<dyn HostSurface>,
        expander: Arc<dyn TemplateExpander>,
        variables: watch::Sender<Arc<VariableView>>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let client = build_client(&config)?;
        let (poll_state, _) = watch::channel(PollState::Idle);
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let timer_cancel = cancel.child_token();

        Ok(Self {
            inner: Arc::new(ServiceInner {
                config: ArcSwap::from_pointee(config),
                client: ArcSwap::from_pointee(client),
                store: DirectoryStore::new(),
                host,
                expander,
                publisher: Mutex::new(ViewPublisher::new()),
                status: StatusTracker::new(),
                poll_state,
                variables,
                refresh_tx,
                refresh_rx: Mutex::new(Some(refresh_rx)),
                cancel,
                timer_cancel: Mutex::new(timer_cancel),
                timer_handle: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> Arc<SyncConfig> {
        self.inner.config.load_full()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the poll worker, arm the timer, and run the initial poll.
    ///
    /// A failed initial poll is reported but does not stop the background
    /// tasks; the timer keeps retrying.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.ensure_running()?;

        if let Some(rx) = self.inner.refresh_rx.lock().await.take() {
            let svc = self.clone();
            let cancel = self.inner.cancel.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(poll_worker_task(svc, rx, cancel)));
        }

        self.arm_timer().await;
        self.set_status(StatusReport::new(ConnectionStatus::Connecting));
        info!(base_url = %self.config().base_url, "sync service started");

        self.poll().await.map(|_| ())
    }

    /// Apply a new configuration: swap the client, replace the timer, and
    /// poll once with the new settings.
    pub async fn reconfigure(&self, config: SyncConfig) -> Result<(), CoreError> {
        self.ensure_running()?;
        config.validate()?;
        let client = build_client(&config)?;

        self.inner.client.store(Arc::new(client));
        self.inner.config.store(Arc::new(config));
        self.arm_timer().await;
        self.set_status(StatusReport::new(ConnectionStatus::Connecting));
        info!(base_url = %self.config().base_url, "sync service reconfigured");

        self.poll().await.map(|_| ())
    }

    /// Cancel all background work and clear the directory.
    ///
    /// In-flight polls driven by the worker are dropped; a poll started by
    /// a caller finishes its request but discards the result.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        if let Some(handle) = self.inner.timer_handle.lock().await.take() {
            let _ = handle.await;
        }
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        // A caller-driven poll may still hold the gate; let it finish and
        // discard its result before clearing.
        let _gate = self.inner.publisher.lock().await;
        self.inner.store.clear();
        self.inner.poll_state.send_replace(PollState::Idle);
        debug!("sync service shut down");
    }

    /// Cancel the current timer (if any) and arm one for the configured
    /// interval. An interval of `0` leaves polling manual.
    async fn arm_timer(&self) {
        let token = {
            let mut guard = self.inner.timer_cancel.lock().await;
            guard.cancel();
            *guard = self.inner.cancel.child_token();
            guard.clone()
        };

        let mut slot = self.inner.timer_handle.lock().await;
        if let Some(previous) = slot.take() {
            let _ = previous.await;
        }

        match self.config().poll_interval() {
            Some(period) => {
                debug!(secs = period.as_secs(), "arming poll timer");
                *slot = Some(tokio::spawn(timer_task(self.clone(), period, token)));
            }
            None => debug!("poll interval is 0, polling only on demand"),
        }
    }

    fn ensure_running(&self) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            Err(CoreError::ShutDown)
        } else {
            Ok(())
        }
    }

    // ── Polling ──────────────────────────────────────────────────

    /// Fetch the stream collection, rebuild the directory, and publish
    /// whichever views changed.
    ///
    /// Concurrent callers queue on the poll gate, so rebuilds never
    /// interleave. On failure the previous directory stays in place.
    pub async fn poll(&self) -> Result<RebuildReport, CoreError> {
        self.ensure_running()?;
        let mut publisher = self.inner.publisher.lock().await;
        self.inner.poll_state.send_replace(PollState::Polling);

        let client = self.inner.client.load_full();
        let page = client.list_live_streams().await.map_err(CoreError::from);

        if self.inner.cancel.is_cancelled() {
            debug!("discarding poll result after shutdown");
            return Err(CoreError::ShutDown);
        }

        let page = match page {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "poll failed, keeping last known directory");
                self.set_status(StatusReport::from_error(&e));
                self.inner.poll_state.send_replace(PollState::Failed);
                return Err(e);
            }
        };

        let (directory, report) = Directory::from_records(page.docs);
        self.inner.store.replace(directory);
        let snapshot = self.inner.store.snapshot();

        let published = publisher.publish(&snapshot, self.inner.host.as_ref());
        if published.variables {
            self.inner
                .variables
                .send_replace(publisher.current_variables());
        }
        drop(publisher);

        self.set_status(StatusReport::new(ConnectionStatus::Ok));
        self.inner.poll_state.send_replace(PollState::Ready);
        debug!(
            streams = report.accepted,
            skipped = report.skipped.len(),
            republished = published.any(),
            "poll complete"
        );
        Ok(report)
    }

    /// Schedule a poll on the background worker without waiting for it.
    ///
    /// Requests made while one is already pending are merged into it.
    pub fn request_refresh(&self) {
        match self.inner.refresh_tx.try_send(()) {
            Ok(()) => debug!("refresh requested"),
            Err(TrySendError::Full(())) => debug!("refresh already pending"),
            Err(TrySendError::Closed(())) => debug!("poll worker gone, refresh dropped"),
        }
    }

    // ── Resolution ───────────────────────────────────────────────

    /// Resolve raw options against the current directory.
    pub async fn resolve(&self, options: &ReferenceOptions) -> Result<ResolvedTarget, CoreError> {
        let directory = self.inner.store.snapshot();
        Resolver::new(&directory, self.inner.expander.as_ref())
            .resolve(options)
            .await
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Execute a [`Command`].
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            Command::EnableStream { stream, mode } => self.enable_stream(&stream, mode).await,
            Command::EnablePlatform { platform, mode } => {
                self.enable_platform(&platform, mode).await
            }
        }
    }

    /// Set a stream's enabled flag.
    ///
    /// An unmatched token is sent as-is for `ON`/`OFF`. `TOGGLE` needs the
    /// current flag, so an unknown stream fails without a request.
    pub async fn enable_stream(
        &self,
        token: &str,
        mode: EnableMode,
    ) -> Result<CommandResult, CoreError> {
        self.ensure_running()?;
        let directory = self.inner.store.snapshot();
        let stream_id = Resolver::new(&directory, self.inner.expander.as_ref())
            .resolve_stream(token)
            .await
            .inspect_err(|e| error!(token, error = %e, "enable-stream: cannot resolve stream"))?;

        let current = directory.by_id(&stream_id).map(|s| s.enabled);
        let Some(enabled) = mode.target(current) else {
            error!(stream_id = %stream_id, "enable-stream: cannot toggle a stream that is not in the directory");
            return Err(CoreError::StreamNotFound {
                identifier: stream_id,
            });
        };

        let client = self.inner.client.load_full();
        let result = client
            .set_stream_enabled(&stream_id, enabled)
            .await
            .map(|_| ())
            .map_err(CoreError::from);
        self.record_outcome(result.as_ref().err());

        match result {
            Ok(()) => {
                info!(stream_id = %stream_id, enabled, "stream updated");
                self.request_refresh();
                Ok(CommandResult::Stream { stream_id, enabled })
            }
            Err(e) => {
                error!(stream_id = %stream_id, error = %e, "enable-stream failed");
                Err(e)
            }
        }
    }

    /// Set the enabled flag of every platform a compound reference selects.
    ///
    /// One request per platform, issued concurrently. Failures are
    /// reported per platform and do not affect the others.
    pub async fn enable_platform(
        &self,
        token: &str,
        mode: EnableMode,
    ) -> Result<CommandResult, CoreError> {
        self.ensure_running()?;
        let directory = self.inner.store.snapshot();
        let (stream_id, platforms) = Resolver::new(&directory, self.inner.expander.as_ref())
            .resolve_platform(token)
            .await
            .inspect_err(|e| error!(token, error = %e, "enable-platform: cannot resolve reference"))?;

        let client = self.inner.client.load_full();
        let requests = platforms.into_iter().map(|platform| {
            let client = Arc::clone(&client);
            let stream_id = stream_id.as_str();
            async move {
                let enabled = mode.apply(platform.enabled);
                let result = client
                    .set_platform_enabled(stream_id, &platform.platform_id, enabled)
                    .await
                    .map(|_| ())
                    .map_err(CoreError::from);
                PlatformOutcome {
                    platform_id: platform.platform_id,
                    enabled,
                    result,
                }
            }
        });
        let outcomes = join_all(requests).await;

        if !outcomes.is_empty() {
            self.record_outcome(outcomes.iter().find_map(|o| o.result.as_ref().err()));
        }
        if outcomes.iter().any(PlatformOutcome::is_ok) {
            self.request_refresh();
        }

        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => info!(
                    stream_id = %stream_id,
                    platform_id = %outcome.platform_id,
                    enabled = outcome.enabled,
                    "platform updated"
                ),
                Err(e) => error!(
                    stream_id = %stream_id,
                    platform_id = %outcome.platform_id,
                    error = %e,
                    "enable-platform failed"
                ),
            }
        }

        Ok(CommandResult::Platforms {
            stream_id,
            outcomes,
        })
    }

    // ── Feedback queries ─────────────────────────────────────────

    /// Whether the stream named by `token` (id or name) is enabled.
    /// Unknown streams read as disabled.
    pub async fn stream_enabled(&self, token: &str) -> bool {
        let directory = self.inner.store.snapshot();
        let token = self.inner.expander.expand(token).await;
        resolve::match_stream(&directory, &token).is_some_and(|s| s.enabled)
    }

    /// Whether the reference selects at least one platform and all of the
    /// selected platforms are enabled.
    pub async fn platforms_enabled(&self, token: &str) -> bool {
        let directory = self.inner.store.snapshot();
        let token = self.inner.expander.expand(token).await;
        PlatformReference::parse(&token)
            .and_then(|r| resolve::select_platforms(&directory, &r))
            .is_some_and(|(_, platforms)| {
                !platforms.is_empty() && platforms.iter().all(|p| p.enabled)
            })
    }

    // ── State observation ────────────────────────────────────────

    /// Current directory snapshot.
    pub fn snapshot(&self) -> Arc<Directory> {
        self.inner.store.snapshot()
    }

    pub fn status(&self) -> StatusReport {
        self.inner.status.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<StatusReport> {
        self.inner.status.subscribe()
    }

    pub fn poll_state(&self) -> watch::Receiver<PollState> {
        self.inner.poll_state.subscribe()
    }

    /// Latest published variable view.
    pub fn variables(&self) -> watch::Receiver<Arc<VariableView>> {
        self.inner.variables.subscribe()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.store.last_refresh()
    }

    // ── Status bookkeeping ───────────────────────────────────────

    fn set_status(&self, report: StatusReport) {
        if self.inner.status.set(report.clone()) {
            info!(status = %report, "connection status changed");
            self.inner.host.update_status(&report);
        }
    }

    /// Reflect a remote call's outcome in the connection status. `None`
    /// means the call succeeded.
    fn record_outcome(&self, failure: Option<&CoreError>) {
        match failure {
            None => self.set_status(StatusReport::new(ConnectionStatus::Ok)),
            Some(e) if !e.is_resolution_failure() => self.set_status(StatusReport::from_error(e)),
            Some(_) => {}
        }
    }
}

fn build_client(config: &SyncConfig) -> Result<CastrClient, CoreError> {
    Ok(CastrClient::new(
        config.base_url.as_str(),
        config.credentials(),
        &config.transport(),
    )?)
}

// ── Background tasks ─────────────────────────────────────────────

/// Single consumer of refresh triggers. Runs one poll per trigger; a
/// trigger arriving mid-poll waits in the queue slot.
async fn poll_worker_task(
    service: SyncService,
    mut rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            msg = rx.recv() => {
                if msg.is_none() {
                    break;
                }
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = service.poll() => {
                        if let Err(e) = result {
                            debug!(error = %e, "background poll failed");
                        }
                    }
                }
            }
        }
    }
    debug!("poll worker stopped");
}

/// Fires a refresh request every `period` until cancelled.
async fn timer_task(service: SyncService, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("poll timer tick");
                service.request_refresh();
            }
        }
    }
}

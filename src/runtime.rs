use chrono::Utc;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::{
    select,
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval, interval_at},
};

use crate::{
    DashError,
    controller::{Command, Dashboard, Effect, Ticket},
    feed::{FeedLoader, NewsFeed, Zone},
    store::KeyValueStore,
};

/* ---------------- Public API ---------------- */

/// Timer periods and output for a running dashboard.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Feed reload cadence. Default: 60s.
    pub refresh: Duration,
    /// Hero rotation cadence. Default: 60s.
    pub rotate: Duration,
    /// Clock re-render cadence. Default: 1s.
    pub clock: Duration,
    /// Where each rendered page is written. Default: none.
    pub output: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            refresh: Duration::from_secs(60),
            rotate: Duration::from_secs(60),
            clock: Duration::from_secs(1),
            output: None,
        }
    }
}

/// A handle for a running dashboard task.
///
/// Dropping the handle stops the task and with it every timer.
pub struct DashboardHandle {
    join: JoinHandle<()>,
    stop_tx: Option<oneshot::Sender<()>>,
    commands: mpsc::Sender<Command>,
}

impl DashboardHandle {
    /// Queue a user command.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::Data`] if the dashboard task has already exited.
    pub async fn send(&self, cmd: Command) -> Result<(), DashError> {
        self.commands
            .send(cmd)
            .await
            .map_err(|_| DashError::Data("dashboard task has stopped".into()))
    }

    /// A sender that can outlive borrowing the handle (e.g. for an input reader task).
    pub fn commands(&self) -> mpsc::Sender<Command> {
        self.commands.clone()
    }

    /// Politely ask the dashboard to stop and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.join).await;
    }

    /// Immediately abort the background task.
    pub fn abort(self) {
        self.join.abort();
    }
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Builder to start the dashboard loop.
pub struct DashboardBuilder<S> {
    loader: FeedLoader,
    store: S,
    cfg: RuntimeConfig,
}

impl<S: KeyValueStore + 'static> DashboardBuilder<S> {
    /// Start from a loader (cloned internally) and the store user edits persist to.
    pub fn new(loader: &FeedLoader, store: S) -> Self {
        Self {
            loader: loader.clone(),
            store,
            cfg: RuntimeConfig::default(),
        }
    }

    /// Replace the whole timer/output configuration.
    #[must_use]
    pub fn config(mut self, cfg: RuntimeConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Feed reload interval.
    #[must_use]
    pub fn refresh_every(mut self, dur: Duration) -> Self {
        self.cfg.refresh = dur;
        self
    }

    /// Hero rotation interval.
    #[must_use]
    pub fn rotate_every(mut self, dur: Duration) -> Self {
        self.cfg.rotate = dur;
        self
    }

    /// Clock interval.
    #[must_use]
    pub fn clock_every(mut self, dur: Duration) -> Self {
        self.cfg.clock = dur;
        self
    }

    /// Write every rendered page to this file.
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.cfg.output = Some(path.into());
        self
    }

    /// Start the dashboard. Returns a handle and a receiver of rendered pages.
    ///
    /// Feeds load immediately, then on every refresh tick or `Refresh` command.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::Data`] if a period is zero.
    pub fn start(self) -> Result<(DashboardHandle, watch::Receiver<String>), DashError> {
        let cfg = self.cfg;
        if cfg.refresh.is_zero() || cfg.rotate.is_zero() || cfg.clock.is_zero() {
            return Err(DashError::Data("dashboard: timer periods must be non-zero".into()));
        }

        let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(64);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (page_tx, page_rx) = watch::channel(String::new());
        // fetch tasks report back here
        let (res_tx, mut res_rx) = mpsc::channel::<Fetched>(16);

        let loader = self.loader;
        let mut dashboard = Dashboard::new(self.store);

        let join = tokio::spawn(async move {
            let mut refresh = interval(cfg.refresh);
            refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut clock = interval(cfg.clock);
            clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut rotate = interval_at(Instant::now() + cfg.rotate, cfg.rotate);
            rotate.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut rotation_generation = dashboard.rotation().generation();

            loop {
                select! {
                    _ = refresh.tick() => {
                        spawn_refresh(&mut dashboard, &loader, &res_tx);
                    }
                    _ = clock.tick() => {
                        let html = render_now(&dashboard);
                        publish(html, &page_tx, cfg.output.as_ref()).await;
                    }
                    _ = rotate.tick(), if dashboard.rotation().is_rotating() => {
                        if dashboard.tick_rotation() {
                            let html = render_now(&dashboard);
                            publish(html, &page_tx, cfg.output.as_ref()).await;
                        }
                    }
                    Some(fetched) = res_rx.recv() => {
                        let applied = match fetched {
                            Fetched::News(ticket, result) => dashboard.apply_news(ticket, result),
                            Fetched::Zones(ticket, result) => dashboard.apply_zones(ticket, result),
                        };
                        // a restarted rotation gets a fresh full period
                        let generation = dashboard.rotation().generation();
                        if generation != rotation_generation {
                            rotation_generation = generation;
                            rotate.reset();
                        }
                        if applied {
                            let html = render_now(&dashboard);
                            publish(html, &page_tx, cfg.output.as_ref()).await;
                        }
                    }
                    cmd = cmd_rx.recv() => {
                        let Some(cmd) = cmd else { break };
                        match dashboard.handle(cmd) {
                            Effect::Refresh => spawn_refresh(&mut dashboard, &loader, &res_tx),
                            Effect::Render => {
                                let html = render_now(&dashboard);
                                publish(html, &page_tx, cfg.output.as_ref()).await;
                            }
                            Effect::Nothing => {}
                        }
                    }
                    _ = &mut stop_rx => {
                        break;
                    }
                }
            }
            tracing::debug!("dashboard loop stopped");
        });

        Ok((
            DashboardHandle {
                join,
                stop_tx: Some(stop_tx),
                commands: cmd_tx,
            },
            page_rx,
        ))
    }
}

/* ---------------- Internal ---------------- */

enum Fetched {
    News(Ticket, Result<NewsFeed, DashError>),
    Zones(Ticket, Result<Vec<Zone>, DashError>),
}

fn spawn_refresh<S: KeyValueStore>(
    dashboard: &mut Dashboard<S>,
    loader: &FeedLoader,
    tx: &mpsc::Sender<Fetched>,
) {
    let news_ticket = dashboard.begin_news();
    let zones_ticket = dashboard.begin_zones();

    let (l, t) = (loader.clone(), tx.clone());
    tokio::spawn(async move {
        let _ = t.send(Fetched::News(news_ticket, l.news().await)).await;
    });
    let (l, t) = (loader.clone(), tx.clone());
    tokio::spawn(async move {
        let _ = t.send(Fetched::Zones(zones_ticket, l.zones().await)).await;
    });
}

// Rendering stays outside `publish` so no borrow of the dashboard is held across an await.
fn render_now<S: KeyValueStore>(dashboard: &Dashboard<S>) -> Option<String> {
    match dashboard.render(Utc::now()) {
        Ok(html) => Some(html),
        Err(e) => {
            tracing::error!(error = %e, "render failed");
            None
        }
    }
}

async fn publish(html: Option<String>, page_tx: &watch::Sender<String>, output: Option<&PathBuf>) {
    let Some(html) = html else { return };

    if let Some(path) = output {
        if let Err(e) = write_page(path, &html).await {
            tracing::error!(path = %path.display(), error = %e, "failed to write page");
        }
    }
    page_tx.send_replace(html);
}

// Readers of the output file never see a half-written page.
async fn write_page(path: &Path, html: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("html.tmp");
    tokio::fs::write(&tmp, html).await?;
    tokio::fs::rename(&tmp, path).await
}

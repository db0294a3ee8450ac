//! Live widget sessions.
//!
//! Each browser tab gets its own widget instance; nothing is shared between
//! sessions except the geocoder client.
//!
//! # Design Decisions
//! - A slot is reserved before the widget is built, so concurrent creates
//!   never exceed `max_sessions`
//! - Every lookup refreshes the session's last-used time; sessions idle for
//!   longer than `session_idle_secs` are swept by a background task

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use uuid::Uuid;

use crate::config::WidgetConfig;
use crate::geocoding::Geocoder;
use crate::overlay::{HeadlessLayer, HeadlessMap};
use crate::share::ShareError;
use crate::widget::instance::Widget;

/// Widget type hosted by the HTTP service.
pub type SessionWidget<G> = Widget<G, HeadlessLayer, HeadlessMap>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session limit of {0} reached")]
    Full(usize),

    #[error(transparent)]
    Config(#[from] ShareError),
}

struct Session<G> {
    widget: Arc<SessionWidget<G>>,
    last_used: Instant,
}

/// Thread-safe map of session id → widget.
pub struct SessionRegistry<G> {
    geocoder: Arc<G>,
    config: WidgetConfig,
    sessions: DashMap<Uuid, Session<G>>,
    /// Slots taken, including sessions still being built.
    reserved: AtomicUsize,
}

impl<G: Geocoder> SessionRegistry<G> {
    pub fn new(geocoder: Arc<G>, config: WidgetConfig) -> Self {
        Self {
            geocoder,
            config,
            sessions: DashMap::new(),
            reserved: AtomicUsize::new(0),
        }
    }

    /// Start a new widget session.
    pub fn create(&self) -> Result<(Uuid, Arc<SessionWidget<G>>), SessionError> {
        let limit = self.config.server.max_sessions;
        let reserved = self
            .reserved
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < limit).then_some(n + 1));
        if reserved.is_err() {
            tracing::warn!(limit, "Rejecting new session, limit reached");
            return Err(SessionError::Full(limit));
        }

        let widget = match Widget::new(
            self.geocoder.clone(),
            HeadlessLayer::new(),
            HeadlessMap::new(),
            &self.config,
        ) {
            Ok(widget) => Arc::new(widget),
            Err(e) => {
                self.reserved.fetch_sub(1, Ordering::SeqCst);
                return Err(e.into());
            }
        };

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                widget: widget.clone(),
                last_used: Instant::now(),
            },
        );
        tracing::info!(session = %id, active = self.sessions.len(), "Session created");
        Ok((id, widget))
    }

    /// Look a session up and mark it as used.
    pub fn get(&self, id: &Uuid) -> Option<Arc<SessionWidget<G>>> {
        let mut session = self.sessions.get_mut(id)?;
        session.last_used = Instant::now();
        Some(session.widget.clone())
    }

    /// Tear a session down and forget it. Returns false for unknown ids.
    pub fn close(&self, id: &Uuid) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                self.release(session);
                tracing::info!(session = %id, active = self.sessions.len(), "Session closed");
                true
            }
            None => false,
        }
    }

    /// Tear down every session (shutdown path).
    pub fn close_all(&self) {
        let ids: Vec<Uuid> = self.sessions.iter().map(|r| *r.key()).collect();
        for id in ids {
            self.close(&id);
        }
    }

    /// Close every session idle for at least the configured TTL.
    /// Returns how many were closed.
    pub fn sweep_idle(&self) -> usize {
        let ttl = self.idle_ttl();
        let now = Instant::now();
        let expired: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|r| now.duration_since(r.value().last_used) >= ttl)
            .map(|r| *r.key())
            .collect();

        let mut closed = 0;
        for id in expired {
            // Re-checked under the shard lock: a concurrent get may have refreshed it.
            let removed = self
                .sessions
                .remove_if(&id, |_, s| Instant::now().duration_since(s.last_used) >= ttl);
            if let Some((_, session)) = removed {
                self.release(session);
                tracing::info!(session = %id, "Idle session expired");
                closed += 1;
            }
        }
        if closed > 0 {
            tracing::info!(closed, active = self.sessions.len(), "Idle sessions swept");
        }
        closed
    }

    /// Run [`Self::sweep_idle`] periodically until shutdown.
    pub fn spawn_idle_sweeper(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let period = (self.idle_ttl() / 4).max(Duration::from_secs(1));

        tokio::spawn(async move {
            tracing::info!(period_secs = period.as_secs(), "Idle session sweeper starting");
            let mut ticker = time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.sweep_idle();
                    }
                    _ = shutdown.recv() => {
                        tracing::info!("Idle session sweeper received shutdown signal, exiting loop");
                        break;
                    }
                }
            }
        })
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.config.server.session_idle_secs)
    }

    fn release(&self, session: Session<G>) {
        session.widget.teardown();
        self.reserved.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use crate::model::Field;
    use crate::overlay::OverlayState;
    use crate::testing::ScriptedGeocoder;

    fn registry_with(max_sessions: usize, idle_secs: u64) -> SessionRegistry<ScriptedGeocoder> {
        let mut config = WidgetConfig::default();
        config.server.max_sessions = max_sessions;
        config.server.session_idle_secs = idle_secs;
        let geocoder = ScriptedGeocoder::new()
            .with("Paris", &[("Paris", 48.8, 2.3)])
            .with("London", &[("London", 51.5, -0.1)]);
        SessionRegistry::new(Arc::new(geocoder), config)
    }

    fn registry(max_sessions: usize) -> SessionRegistry<ScriptedGeocoder> {
        registry_with(max_sessions, 1800)
    }

    #[test]
    fn test_session_limit() {
        let registry = registry(2);
        registry.create().unwrap();
        registry.create().unwrap();
        assert!(matches!(registry.create(), Err(SessionError::Full(2))));
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_concurrent_creates_respect_limit() {
        let registry = registry(5);
        let created: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..32).map(|_| s.spawn(|| registry.create().is_ok())).collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap() as usize)
                .sum()
        });
        assert_eq!(created, 5);
        assert_eq!(registry.count(), 5);
    }

    #[test]
    fn test_closed_slot_is_reusable() {
        let registry = registry(1);
        let (id, _) = registry.create().unwrap();
        assert!(registry.close(&id));
        assert!(registry.create().is_ok());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry(10);
        let (a, widget_a) = registry.create().unwrap();
        let (b, _) = registry.create().unwrap();
        assert_ne!(a, b);

        widget_a.search("Paris", "London").await.unwrap();
        assert!(registry.get(&a).unwrap().route().is_some());
        assert!(registry.get(&b).unwrap().route().is_none());
        assert_eq!(registry.get(&b).unwrap().input(Field::Start), "");
    }

    #[tokio::test]
    async fn test_close_tears_down() {
        let registry = registry(10);
        let (id, widget) = registry.create().unwrap();
        widget.search("Paris", "London").await.unwrap();

        assert!(registry.close(&id));
        assert!(!registry.close(&id));
        assert!(registry.get(&id).is_none());
        assert_eq!(widget.overlay_state(), OverlayState::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_sessions_expire_and_free_slots() {
        let registry = registry_with(2, 60);
        let (_, widget) = registry.create().unwrap();
        widget.search("Paris", "London").await.unwrap();
        registry.create().unwrap();
        assert!(matches!(registry.create(), Err(SessionError::Full(2))));

        time::sleep(Duration::from_secs(61)).await;
        assert_eq!(registry.sweep_idle(), 2);
        assert_eq!(registry.count(), 0);
        assert_eq!(widget.overlay_state(), OverlayState::Empty);
        assert!(registry.create().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_keeps_session_alive() {
        let registry = registry_with(10, 60);
        let (active, _) = registry.create().unwrap();
        let (idle, _) = registry.create().unwrap();

        time::sleep(Duration::from_secs(40)).await;
        assert!(registry.get(&active).is_some());
        time::sleep(Duration::from_secs(30)).await;

        assert_eq!(registry.sweep_idle(), 1);
        assert!(registry.get(&active).is_some());
        assert!(registry.get(&idle).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_until_shutdown() {
        let registry = Arc::new(registry_with(10, 60));
        let shutdown = Shutdown::new();
        let sweeper = registry.clone().spawn_idle_sweeper(shutdown.subscribe());

        registry.create().unwrap();
        time::sleep(Duration::from_secs(90)).await;
        assert_eq!(registry.count(), 0);

        shutdown.trigger();
        sweeper.await.unwrap();
    }
}

// ABOUTME: Application context wiring configuration, the toast store, its producer and its consumer
// One context per process (or per test); nothing here is a global

use crate::app::notifier::Notifier;
use crate::app::service::MailserverService;
use crate::app::store::NotificationStore;
use crate::app::toast_board::{ToastBoard, ToastRenderer};
use crate::config::AppConfig;
use crate::docker::{DockerMailserver, MailserverExec};
use crate::models::ErrorResponse;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub struct App<R> {
    pub config: AppConfig,
    pub store: NotificationStore,
    pub notifier: Notifier,
    pub board: ToastBoard<R>,
}

impl<R: ToastRenderer + 'static> App<R> {
    pub fn new(config: AppConfig, renderer: R) -> Self {
        let store = NotificationStore::default();
        let notifier = Notifier::new(store.clone());
        let board = ToastBoard::new(&store, renderer, config.toasts.duration());

        Self {
            config,
            store,
            notifier,
            board,
        }
    }

    /// Connects to Docker; a failure is reported as an error toast.
    pub async fn connect(&self) -> Option<MailserverService<DockerMailserver>> {
        match DockerMailserver::connect(&self.config.docker).await {
            Ok(mailserver) => {
                info!("Mailserver access ready");
                Some(MailserverService::new(mailserver))
            }
            Err(e) => {
                warn!("Failed to connect to Docker: {}", e);
                self.notifier.error(&ErrorResponse::from(&e));
                None
            }
        }
    }

    /// Retires expired toasts.
    pub fn tick(&self) -> usize {
        self.board.tick(Instant::now())
    }

    /// Polls the mailserver status every `interval`, toasting on changes and
    /// expiring toasts, until `shutdown` resolves.
    pub async fn watch<E, S>(&self, service: &MailserverService<E>, interval: Duration, shutdown: S)
    where
        E: MailserverExec,
        S: Future,
    {
        let mut refresh = tokio::time::interval(interval);
        let mut tick_rate = tokio::time::interval(Duration::from_millis(250));
        let mut last_running: Option<bool> = None;
        tokio::pin!(shutdown);

        info!("Watching mailserver status every {:?}", interval);
        loop {
            tokio::select! {
                _ = refresh.tick() => {
                    if let Some(status) = self.notifier.report(service.status().await) {
                        self.notifier.status_changed(last_running, &status);
                        last_running = Some(status.running);
                    }
                }
                _ = tick_rate.tick() => {
                    self.tick();
                }
                _ = &mut shutdown => {
                    info!("Stopping watch");
                    break;
                }
            }
        }
    }
}

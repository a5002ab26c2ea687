use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{OutputStore, ReqwestGateway, TomlSettingsStore};
use crate::app::pipeline;
use crate::domain::{AppSettings, Command, DomainError, JobConfig, Mode};
use crate::infrastructure::init_logging;
use crate::ports::{EventSink, HttpGateway, SettingsStore};

/// Controller the embedding host talks to.
///
/// Holds the current job configuration, applies named commands to it, and
/// runs one processing pipeline at a time. Each `process` call works on a
/// snapshot of the configuration; later mutations never affect a job in
/// flight.
pub struct JobController {
    config: RwLock<JobConfig>,
    settings: AppSettings,
    gateway: Arc<dyn HttpGateway>,
    events: Arc<dyn EventSink>,
    busy: AtomicBool,
    _log_guard: Option<WorkerGuard>,
}

impl JobController {
    /// Initialize the controller: settings, logging, and the HTTP gateway.
    pub fn new(events: Arc<dyn EventSink>) -> Result<Self, DomainError> {
        let store = TomlSettingsStore::new()?;
        let settings = store.load()?;
        let log_guard = init_logging(
            &store.logs_dir(),
            &settings.logging.level,
            settings.logging.file_logging,
        )?;
        info!("VoxRoute starting up");
        Ok(Self {
            config: RwLock::new(JobConfig::default()),
            settings,
            gateway: ReqwestGateway::global(),
            events,
            busy: AtomicBool::new(false),
            _log_guard: log_guard,
        })
    }

    /// Assemble a controller from explicit parts. Used by embedders that own
    /// their logging setup, and by tests.
    pub fn with_parts(
        settings: AppSettings,
        gateway: Arc<dyn HttpGateway>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config: RwLock::new(JobConfig::default()),
            settings,
            gateway,
            events,
            busy: AtomicBool::new(false),
            _log_guard: None,
        }
    }

    /// Handle one named command from the host. Valid assignments are echoed
    /// as a `status` event; rejected ones leave the configuration unchanged
    /// and emit an `error` event.
    pub fn handle(&self, name: &str, value: &str) {
        match Command::parse(name, value) {
            Ok(command) => {
                let status = self.config.write().apply(command);
                self.events.status(&status);
            }
            Err(err) => {
                error!(param = name, value = value, error = %err, "Rejected command");
                self.events.error(&err.to_string());
            }
        }
    }

    /// Apply an already-typed command and return its status line.
    pub fn apply(&self, command: Command) -> String {
        self.config.write().apply(command)
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> JobConfig {
        self.config.read().clone()
    }

    /// Run one job on the current configuration snapshot.
    ///
    /// Every failure is converted into exactly one `error` event here; a
    /// `process` issued while another job is in flight is rejected, not
    /// queued.
    pub async fn process(&self) {
        self.run_with(None).await;
    }

    /// Run the transform path on the current snapshot regardless of the
    /// configured mode. The stored configuration keeps its mode.
    pub async fn process_stable(&self) {
        self.run_with(Some(Mode::Transform)).await;
    }

    async fn run_with(&self, mode_override: Option<Mode>) {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.events.error(&DomainError::Busy.to_string());
            return;
        }
        let _slot = SlotGuard(&self.busy);

        let mut job = self.config.read().clone();
        if let Some(mode) = mode_override {
            job.mode = mode;
        }
        if let Err(err) = self.run_job(job).await {
            error!(error = %err, "Job failed");
            self.events.error(&err.to_string());
        }
    }

    async fn run_job(&self, job: JobConfig) -> Result<(), DomainError> {
        let output_dir = self.settings.output_dir();
        let store = tokio::task::spawn_blocking(move || OutputStore::new(output_dir))
            .await
            .map_err(|e| DomainError::Io(e.to_string()))??;
        pipeline::run(job, self.gateway.clone(), &store, self.events.as_ref())
            .await
            .map(|_| ())
    }
}

/// Releases the single job slot on every exit path.
struct SlotGuard<'a>(&'a AtomicBool);

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

//! Background task management

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

struct RegisteredTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// Owns the periodic maintenance tasks and stops them on shutdown
#[derive(Default)]
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` every `period`; the first run happens one period after start
    pub fn spawn_periodic<F, Fut>(&mut self, name: &'static str, period: Duration, job: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                job().await;
            }
        });
        tracing::debug!(task = name, ?period, "Background task started");
        self.tasks.push(RegisteredTask { name, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Abort every task and wait for them to finish
    pub async fn shutdown(self) {
        for task in &self.tasks {
            task.handle.abort();
        }
        for task in self.tasks {
            if let Err(e) = task.handle.await
                && !e.is_cancelled()
            {
                tracing::error!(task = task.name, error = %e, "Background task failed");
            }
        }
        tracing::info!("Background tasks stopped");
    }
}

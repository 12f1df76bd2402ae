use std::time::Duration;

use tokio::{runtime::Handle, task::JoinHandle};

/// A single pending one-shot timer. Scheduling replaces (and aborts) whatever
/// was pending; dropping the `Cooldown` aborts it too.
pub struct Cooldown {
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl Cooldown {
    pub fn new(runtime: Handle) -> Self {
        Cooldown {
            runtime,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, duration: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            action();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Cooldown {
    fn drop(&mut self) {
        self.cancel();
    }
}

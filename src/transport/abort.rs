use tokio::sync::watch;

/// Group-wide abort flag shared by every rank of one process group.
///
/// The first trigger wins and fixes the exit code. Ranks blocked in a
/// receive observe the abort through [`AbortSignal::triggered`].
#[derive(Debug, Clone)]
pub struct AbortSignal {
    tx: std::sync::Arc<watch::Sender<Option<i32>>>,
}

impl AbortSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    /// Trigger the abort with `code`. Returns `false` if the group had
    /// already been aborted, in which case the first code is kept.
    pub fn trigger(&self, code: i32) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_none() {
                *state = Some(code);
                true
            } else {
                false
            }
        })
    }

    /// The abort code, if the group has been aborted.
    pub fn status(&self) -> Option<i32> {
        *self.tx.borrow()
    }

    /// Resolve once the group is aborted, yielding the abort code.
    pub async fn triggered(&self) -> i32 {
        let mut rx = self.tx.subscribe();
        loop {
            if let Some(code) = *rx.borrow_and_update() {
                return code;
            }
            if rx.changed().await.is_err() {
                // The sender lives in `self`, so this cannot happen while we
                // are borrowed; park rather than spin.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

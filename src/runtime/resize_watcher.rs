use flume::{Receiver, Sender, TrySendError};

/// Host-side handle that reports container box changes.
///
/// Cheap to clone and `Send`, so it can live in a layout callback or on
/// another thread. Notifications coalesce: any number of `notify` calls
/// between two deliveries produce one `resize()`.
#[derive(Debug, Clone)]
pub struct ResizeObserver {
    sender: Sender<()>,
}

impl ResizeObserver {
    /// Reports that the container's content box may have changed.
    ///
    /// Returns `false` once the watcher has been disconnected.
    pub fn notify(&self) -> bool {
        match self.sender.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Disconnected(())) => false,
        }
    }

    /// Whether the engine side is still listening.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.sender.is_disconnected()
    }
}

/// Engine-side end of the container size observation.
///
/// Connected once at engine construction; [`disconnect`](Self::disconnect)
/// drops the receiving end so every outstanding [`ResizeObserver`] goes
/// dead at once.
#[derive(Debug)]
pub struct ResizeWatcher {
    sender: Option<Sender<()>>,
    receiver: Option<Receiver<()>>,
}

impl ResizeWatcher {
    #[must_use]
    pub fn connect() -> Self {
        let (sender, receiver) = flume::bounded(1);
        Self {
            sender: Some(sender),
            receiver: Some(receiver),
        }
    }

    /// A new observer handle, or `None` after disconnect.
    #[must_use]
    pub fn observer(&self) -> Option<ResizeObserver> {
        self.sender.as_ref().map(|sender| ResizeObserver {
            sender: sender.clone(),
        })
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.receiver.is_some()
    }

    /// Drains pending notifications; `true` if at least one arrived.
    pub fn take_pending(&mut self) -> bool {
        self.receiver
            .as_ref()
            .is_some_and(|receiver| receiver.drain().count() > 0)
    }

    /// Stops observing. Returns `false` if already disconnected.
    pub fn disconnect(&mut self) -> bool {
        self.sender = None;
        self.receiver.take().is_some()
    }
}

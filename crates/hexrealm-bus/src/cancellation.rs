//! A one-shot, level-triggered cancellation signal for subscription
//! streams (§4.G "`subscribe(topic, cancellation)`").

use tokio::sync::watch;

/// The subscriber-held half: polled by a subscription stream to learn
/// when to end cleanly.
#[derive(Debug, Clone)]
pub struct Cancellation(watch::Receiver<bool>);

/// The owner-held half: fires the signal once, after which every clone
/// of the paired [`Cancellation`] observes it as cancelled forever.
#[derive(Debug, Clone)]
pub struct CancellationHandle(watch::Sender<bool>);

/// Build a fresh, not-yet-fired cancellation pair.
#[must_use]
pub fn cancellation_pair() -> (CancellationHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancellationHandle(tx), Cancellation(rx))
}

impl CancellationHandle {
    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        let _ = self.0.send(true);
    }
}

impl Cancellation {
    /// Resolve once the signal has fired, immediately if it already
    /// has. Cancel-safe: callers may drop the returned future at any
    /// `.await` point without losing the eventual signal.
    pub async fn cancelled(&mut self) {
        if *self.0.borrow() {
            return;
        }
        while self.0.changed().await.is_ok() {
            if *self.0.borrow() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_immediately_once_fired() {
        let (handle, mut cancellation) = cancellation_pair();
        handle.cancel();
        cancellation.cancelled().await;
    }

    #[tokio::test]
    async fn cancelled_waits_until_fired() {
        let (handle, mut cancellation) = cancellation_pair();
        let waiter = tokio::spawn(async move {
            cancellation.cancelled().await;
        });
        tokio::task::yield_now().await;
        handle.cancel();
        waiter.await.unwrap_or_else(|_| panic!("waiter task must not panic"));
    }
}

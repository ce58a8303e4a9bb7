//! Completion signals for tile animations.
//!
//! The board hands a [`Completion`] to the visual layer whenever it starts an
//! animated operation and keeps the matching [`AnimationEnd`]. Awaiting the
//! end suspends until the visual layer reports the animation finished.
//! Dropping a `Completion` counts as reporting it, so a layer that does not
//! animate can simply discard the handles.

use tokio::sync::oneshot::{self, error::TryRecvError};

/// Creates a connected completion handle and animation end.
pub fn channel() -> (Completion, AnimationEnd) {
    let (tx, rx) = oneshot::channel();

    (Completion { tx: Some(tx) }, AnimationEnd { rx: Some(rx) })
}

pub async fn join_all(ends: impl IntoIterator<Item = AnimationEnd>) {
    for end in ends {
        end.wait().await;
    }
}

/// Visual-layer side of an animation signal.
#[derive(Debug)]
pub struct Completion {
    tx: Option<oneshot::Sender<()>>,
}

impl Completion {
    pub fn complete(mut self) {
        self.signal();
    }

    fn signal(&mut self) {
        if let Some(tx) = self.tx.take() {
            // The board may have stopped waiting already.
            let _ = tx.send(());
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.signal();
    }
}

/// Board side of an animation signal.
#[derive(Debug)]
#[must_use = "an animation end does nothing unless waited on"]
pub struct AnimationEnd {
    rx: Option<oneshot::Receiver<()>>,
}

impl AnimationEnd {
    /// An animation end that has already fired.
    pub const fn finished() -> Self {
        Self { rx: None }
    }

    pub async fn wait(self) {
        if let Some(rx) = self.rx {
            let _ = rx.await;
        }
    }

    pub fn is_finished(&mut self) -> bool {
        match self.rx.as_mut().map(oneshot::Receiver::try_recv) {
            None => true,
            Some(Err(TryRecvError::Empty)) => false,
            Some(_) => {
                self.rx = None;
                true
            }
        }
    }
}

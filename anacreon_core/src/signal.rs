//! Broadcast "something changed" notifications.
//!
//! A [`StateSignal`] is a generation counter on a `watch` channel. Each
//! [`SignalWaiter`] remembers the last generation it saw, so every waiter
//! wakes once per notification and a waiter created between two
//! notifications waits for the next one.

use tokio::sync::watch;

#[derive(Debug)]
pub struct StateSignal {
    generation: watch::Sender<u64>,
}

impl StateSignal {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self { generation }
    }

    pub fn notify(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }

    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// A waiter that will see notifications published after this call.
    pub fn subscribe(&self) -> SignalWaiter {
        SignalWaiter {
            generation: self.generation.subscribe(),
        }
    }
}

impl Default for StateSignal {
    fn default() -> Self {
        StateSignal::new()
    }
}

#[derive(Debug, Clone)]
pub struct SignalWaiter {
    generation: watch::Receiver<u64>,
}

impl SignalWaiter {
    /// Waits for the next notification and returns its generation, or `None`
    /// once the signal has been dropped.
    pub async fn changed(&mut self) -> Option<u64> {
        self.generation.changed().await.ok()?;
        Some(*self.generation.borrow_and_update())
    }
}

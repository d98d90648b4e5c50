use popcorn_catalog::{CancelHandle, CancelToken};
use tracing::debug;

/// The one request a controller may have outstanding.
///
/// Episodes are numbered monotonically; only the number handed out by the
/// latest `begin` is current, and `begin` cancels whatever came before.
#[derive(Debug, Default)]
pub struct EpisodeSlot {
    counter: u64,
    in_flight: Option<(u64, CancelHandle)>,
}

impl EpisodeSlot {
    pub fn begin(&mut self) -> (u64, CancelToken) {
        self.cancel();
        self.counter += 1;
        let handle = CancelHandle::new();
        let token = handle.token();
        self.in_flight = Some((self.counter, handle));
        (self.counter, token)
    }

    /// Cancel the outstanding request, if any. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some((episode, handle)) => {
                debug!("Cancelling episode {}", episode);
                handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_current(&self, episode: u64) -> bool {
        matches!(&self.in_flight, Some((current, _)) if *current == episode)
    }

    /// Close `episode` if it is the current one.
    pub fn finish(&mut self, episode: u64) -> bool {
        if self.is_current(episode) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

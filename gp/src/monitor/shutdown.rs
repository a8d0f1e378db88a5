//! Shutdown signal that can be checked without waiting on it

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;
use std::time::Duration;

/// Wraps the caller's shutdown future. Once it has fired it is never polled
/// again and every later check reports `true`.
pub(crate) struct Shutdown<'a, F> {
    signal: Pin<&'a mut F>,
    fired: bool,
}

impl<'a, F> Shutdown<'a, F>
where
    F: Future<Output = ()>,
{
    pub(crate) fn new(signal: Pin<&'a mut F>) -> Self {
        Self { signal, fired: false }
    }

    /// Poll the signal once; never waits
    pub(crate) async fn fired(&mut self) -> bool {
        if !self.fired {
            let signal = &mut self.signal;
            self.fired = std::future::poll_fn(|cx| Poll::Ready(signal.as_mut().poll(cx).is_ready())).await;
        }
        self.fired
    }

    /// Sleep for `interval`, waking early if the signal fires. Returns whether it fired.
    pub(crate) async fn sleep(&mut self, interval: Duration) -> bool {
        if self.fired {
            return true;
        }
        let fired = tokio::select! {
            biased;
            _ = self.signal.as_mut() => true,
            _ = tokio::time::sleep(interval) => false,
        };
        self.fired = fired;
        fired
    }
}

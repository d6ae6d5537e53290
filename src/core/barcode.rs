//! Barcode resolution chain - Ordered, capability-probed decode strategies.
//!
//! The engine does not implement barcode decoding itself. It owns the
//! fallback order: implementations of [`DecodeStrategy`] wrap an external
//! capability (a native platform detector, a software multi-format decoder,
//! or the operator's manual capture) and the [`BarcodeResolver`] probes each
//! one once at construction, keeping the supported strategies in priority
//! order. While a camera stream is open the resolver polls one frame at a
//! time and must stop the instant a code is found or the operator closes the
//! capture dialog, so scans run against a [`ScanSession`] whose cancellation
//! is a synchronous atomic flag.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, trace};

/// One sampled camera frame (or a static image) handed to the strategies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Raw luminance bytes, row-major, one byte per pixel
    pub data: Vec<u8>,
}

/// A single decode capability in the fallback chain.
pub trait DecodeStrategy: Send + Sync {
    /// Short name used in logs (e.g. "native", "zxing", "manual").
    fn name(&self) -> &'static str;

    /// Capability probe, evaluated once when the resolver is built.
    fn is_supported(&self) -> bool;

    /// Attempts to decode one frame, returning the payload on success.
    fn decode(&self, frame: &Frame) -> Option<String>;
}

/// Strategy adapter over a closure, for tests and for host callbacks such as
/// manual capture.
pub struct FnStrategy<F> {
    name: &'static str,
    supported: bool,
    decode: F,
}

impl<F> FnStrategy<F>
where
    F: Fn(&Frame) -> Option<String> + Send + Sync,
{
    /// Wraps `decode` as a strategy named `name`.
    pub const fn new(name: &'static str, supported: bool, decode: F) -> Self {
        Self {
            name,
            supported,
            decode,
        }
    }
}

impl<F> DecodeStrategy for FnStrategy<F>
where
    F: Fn(&Frame) -> Option<String> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn decode(&self, frame: &Frame) -> Option<String> {
        (self.decode)(frame)
    }
}

/// One open capture dialog. Cancelling is immediate and synchronous: the
/// resolver checks the flag before sampling each frame.
#[derive(Debug, Default)]
pub struct ScanSession {
    cancelled: AtomicBool,
}

impl ScanSession {
    /// Opens a new, not-yet-cancelled session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Stops the scan; the next frame poll observes the flag and returns.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Ordered chain of decode strategies with capability probing at startup.
pub struct BarcodeResolver {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl BarcodeResolver {
    /// Probes every candidate once and keeps the supported ones in the given
    /// priority order.
    #[must_use]
    pub fn new(candidates: Vec<Box<dyn DecodeStrategy>>) -> Self {
        let strategies: Vec<_> = candidates
            .into_iter()
            .filter(|s| {
                let supported = s.is_supported();
                if supported {
                    info!("Barcode strategy '{}' is available", s.name());
                } else {
                    debug!("Barcode strategy '{}' is not supported, skipping", s.name());
                }
                supported
            })
            .collect();
        Self { strategies }
    }

    /// Names of the supported strategies, in the order they will be tried.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Returns true when no strategy survived the capability probe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Attempts every strategy on one frame, returning the first successful
    /// decode.
    #[must_use]
    pub fn resolve(&self, frame: &Frame) -> Option<String> {
        for strategy in &self.strategies {
            if let Some(code) = strategy.decode(frame) {
                debug!("Barcode decoded by strategy '{}'", strategy.name());
                return Some(code);
            }
            trace!("Strategy '{}' found no code in frame", strategy.name());
        }
        None
    }

    /// Polls frames from `frames` until a code is found or `session` is
    /// cancelled. The caller drives frame production (one call of the
    /// iterator per rendered frame) and is responsible for releasing the
    /// media stream once this returns.
    pub fn scan<I>(&self, session: &ScanSession, frames: I) -> Option<String>
    where
        I: IntoIterator<Item = Frame>,
    {
        for frame in frames {
            if session.is_cancelled() {
                debug!("Scan cancelled by operator");
                return None;
            }
            if let Some(code) = self.resolve(&frame) {
                return Some(code);
            }
        }
        None
    }
}

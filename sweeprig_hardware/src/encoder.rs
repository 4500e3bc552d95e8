// Single-channel (non-quadrature) encoder inputs: one rising edge = one pulse.

use core::sync::atomic::{AtomicU32, Ordering};

use stm32f4xx_hal::gpio::{ExtiPin, Input, Pin};

/// Edge counter shared between an EXTI handler and the sampling loop.
///
/// The handler only ever increments; the sampler drains with an atomic
/// swap-to-zero, so an edge arriving mid-sample lands wholly in the current
/// window or wholly in the next, never split or counted twice. No interrupt
/// masking is needed.
pub struct PulseCounter(AtomicU32);

impl PulseCounter {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Records one detected edge. Safe to call from interrupt context.
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads and clears the accumulated count in one step.
    pub fn take(&self) -> u32 {
        self.0.swap(0, Ordering::AcqRel)
    }

    /// Non-destructive read, for diagnostics.
    pub fn count(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// The interrupt side of an encoder channel: owns the EXTI pin so the bound
/// task can acknowledge the edge.
pub struct EncoderInput<const P: char, const N: u8> {
    pin: Pin<P, N, Input>,
}

pub type EncoderA = EncoderInput<'B', 0>;
pub type EncoderB = EncoderInput<'B', 1>;

impl<const P: char, const N: u8> EncoderInput<P, N> {
    pub fn new(pin: Pin<P, N, Input>) -> Self {
        Self { pin }
    }

    pub fn clear_interrupt(&mut self) {
        self.pin.clear_interrupt_pending_bit();
    }
}

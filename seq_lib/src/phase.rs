use std::f64::consts::TAU;
use seq_tools::rf_event::RfEvent;

/*
 Phase of the scanner oscillator relative to a pulse played at a frequency offset. Every pulse
 of a saturation train advances it by offset * 2pi * (active pulse time), and the next pulse
 starts from the advanced phase so the train stays coherent with the offset frequency.
 */
#[derive(Debug,Clone,Copy,Default,PartialEq)]
pub struct PhaseAccumulator {
    phase:f64
}

impl PhaseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
    /// current phase in [0, 2pi)
    pub fn phase(&self) -> f64 {
        self.phase
    }
    /// Advance by one pulse whose non-zero part lasts active_duration seconds.
    pub fn advance_by(&mut self,offset_hz:f64,active_duration:f64) -> f64 {
        let p = (self.phase + offset_hz*TAU*active_duration).rem_euclid(TAU);
        // rem_euclid can round up to exactly 2pi for tiny negative arguments
        self.phase = if p >= TAU {0.0} else {p};
        self.phase
    }
    /// Advance by the pulse that was just emitted.
    pub fn advance(&mut self,offset_hz:f64,pulse:&RfEvent) -> f64 {
        self.advance_by(offset_hz,pulse.active_duration())
    }
}

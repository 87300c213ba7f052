use std::f64::consts::PI;
use std::sync::Arc;
use tracing::debug;
use crate::hardware_constants::SystemLimits;
use crate::pulse::{Hardpulse, Pulse, SincPulse};
use crate::{Error, Result};

/*
 An rf event holds its complex envelope as a real waveform in Hz plus a frequency and phase
 offset applied by the scanner's oscillator. Events are values: changing the offsets produces
 a new event, so a template pulse can be reused for every offset of a sweep without sharing
 mutable state. The waveform itself is shared between derived events.
 */
#[derive(Clone,Debug,PartialEq)]
pub struct RfEvent {
    signal:Arc<[f64]>,
    raster_time:f64,
    delay:f64,
    ringdown_time:f64,
    freq_offset:f64,
    phase_offset:f64,
}

impl RfEvent {
    /// Scale a normalized pulse shape so that its integral yields the flip angle (rad).
    pub fn from_pulse<P:Pulse>(event:&'static str,pulse:&P,flip_angle:f64,sys:&SystemLimits) -> Result<RfEvent> {
        let duration = pulse.duration();
        if !(duration.is_finite() && duration > 0.0) {
            return Err(Error::invalid(event,format!("duration must be positive, got {}",duration)))
        }
        if !flip_angle.is_finite() {
            return Err(Error::invalid(event,format!("flip angle must be finite, got {}",flip_angle)))
        }
        let shape = pulse.render(sys.rf_raster_time);
        if shape.is_empty() {
            return Err(Error::invalid(event,format!("duration {} is shorter than the rf raster time {}",duration,sys.rf_raster_time)))
        }
        let flip_norm = shape.iter().sum::<f64>()*sys.rf_raster_time*2.0*PI;
        if flip_norm.abs() < f64::EPSILON {
            return Err(Error::invalid(event,"pulse shape has no net area"))
        }
        let scale = flip_angle/flip_norm;
        let signal:Arc<[f64]> = shape.iter().map(|s| s*scale).collect();
        debug!("{} built with {} samples, peak {:.3} Hz",event,signal.len(),scale.abs());
        Ok(RfEvent {
            signal,
            raster_time:sys.rf_raster_time,
            delay:sys.rf_dead_time,
            ringdown_time:sys.rf_ringdown_time,
            freq_offset:0.0,
            phase_offset:0.0,
        })
    }

    pub fn signal(&self) -> &[f64] {
        &self.signal
    }
    pub fn raster_time(&self) -> f64 {
        self.raster_time
    }
    pub fn delay(&self) -> f64 {
        self.delay
    }
    pub fn freq_offset(&self) -> f64 {
        self.freq_offset
    }
    pub fn phase_offset(&self) -> f64 {
        self.phase_offset
    }
    /// peak magnitude of the waveform (Hz)
    pub fn amplitude(&self) -> f64 {
        self.signal.iter().fold(0.0,|m,s| f64::max(m,s.abs()))
    }
    pub fn waveform_duration(&self) -> f64 {
        self.signal.len() as f64*self.raster_time
    }
    /// portion of the waveform with non-zero amplitude
    pub fn active_duration(&self) -> f64 {
        self.signal.iter().filter(|s| s.abs() > 0.0).count() as f64*self.raster_time
    }
    /// time the event occupies in its block, including dead and ring-down time
    pub fn duration(&self) -> f64 {
        self.delay + self.waveform_duration() + self.ringdown_time
    }
    pub fn with_offsets(&self,freq_offset:f64,phase_offset:f64) -> RfEvent {
        RfEvent {
            freq_offset,
            phase_offset,
            ..self.clone()
        }
    }
}

pub fn make_block_pulse(flip_angle:f64,duration:f64,sys:&SystemLimits) -> Result<RfEvent> {
    RfEvent::from_pulse("block pulse",&Hardpulse::new(duration),flip_angle,sys)
}

pub fn make_sinc_pulse(flip_angle:f64,duration:f64,time_bw_product:f64,apodization:f64,sys:&SystemLimits) -> Result<RfEvent> {
    if !(time_bw_product.is_finite() && time_bw_product > 0.0) {
        return Err(Error::invalid("sinc pulse",format!("time bandwidth product must be positive, got {}",time_bw_product)))
    }
    if !(0.0..=1.0).contains(&apodization) {
        return Err(Error::invalid("sinc pulse",format!("apodization must be within [0,1], got {}",apodization)))
    }
    RfEvent::from_pulse("sinc pulse",&SincPulse::new(duration,time_bw_product,apodization),flip_angle,sys)
}

use std::fmt;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::hardware_constants::SystemLimits;
use crate::{Error, Result};

#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum Channel{
    X,
    Y,
    Z
}

impl Channel {
    pub const ALL:[Channel;3] = [Channel::X,Channel::Y,Channel::Z];
    pub fn index(&self) -> usize {
        match self {
            Channel::X => 0,
            Channel::Y => 1,
            Channel::Z => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::X => write!(f,"gx"),
            Channel::Y => write!(f,"gy"),
            Channel::Z => write!(f,"gz"),
        }
    }
}

/// trapezoidal gradient on a single channel, amplitude in Hz/m
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct GradEvent {
    channel:Channel,
    amplitude:f64,
    rise_time:f64,
    flat_time:f64,
    fall_time:f64,
    delay:f64,
}

impl GradEvent {
    pub fn channel(&self) -> Channel {
        self.channel
    }
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
    pub fn rise_time(&self) -> f64 {
        self.rise_time
    }
    pub fn flat_time(&self) -> f64 {
        self.flat_time
    }
    pub fn fall_time(&self) -> f64 {
        self.fall_time
    }
    pub fn delay(&self) -> f64 {
        self.delay
    }
    pub fn duration(&self) -> f64 {
        self.delay + self.rise_time + self.flat_time + self.fall_time
    }
}

/*
 Symmetric trapezoid with a given total duration and ramp time. The flat top fills whatever
 the ramps leave over.
 */
pub fn make_trapezoid(channel:Channel,amplitude:f64,duration:f64,rise_time:f64,sys:&SystemLimits) -> Result<GradEvent> {
    const EVENT:&str = "trapezoid";
    if !amplitude.is_finite() {
        return Err(Error::invalid(EVENT,format!("amplitude must be finite, got {}",amplitude)))
    }
    if !(duration.is_finite() && duration > 0.0) {
        return Err(Error::invalid(EVENT,format!("duration must be positive, got {}",duration)))
    }
    if !(rise_time.is_finite() && rise_time > 0.0) {
        return Err(Error::invalid(EVENT,format!("rise time must be positive, got {}",rise_time)))
    }
    let fall_time = rise_time;
    let flat_time = duration - rise_time - fall_time;
    if flat_time < -1E-12 {
        return Err(Error::invalid(EVENT,format!("duration {} is too short for rise time {}",duration,rise_time)))
    }
    if amplitude.abs() > sys.max_grad {
        return Err(Error::HardwareLimit{event:EVENT,quantity:"amplitude (Hz/m)",value:amplitude.abs(),limit:sys.max_grad})
    }
    let slew = amplitude.abs()/rise_time;
    if slew > sys.max_slew {
        return Err(Error::HardwareLimit{event:EVENT,quantity:"slew rate (Hz/m/s)",value:slew,limit:sys.max_slew})
    }
    debug!("{} trapezoid: {:.1} Hz/m, rise {} s, flat {} s",channel,amplitude,rise_time,flat_time.max(0.0));
    Ok(GradEvent {
        channel,
        amplitude,
        rise_time,
        flat_time:flat_time.max(0.0),
        fall_time,
        delay:0.0,
    })
}

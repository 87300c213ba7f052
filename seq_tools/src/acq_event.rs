use crate::hardware_constants::SystemLimits;
use crate::{Error, Result};

#[derive(Clone,Copy,Debug,PartialEq)]
pub struct AdcEvent {
    n_samples:u32,
    dwell:f64,
    delay:f64,
    dead_time:f64,
    freq_offset:f64,
    phase_offset:f64,
}

impl AdcEvent {
    pub fn n_samples(&self) -> u32 {
        self.n_samples
    }
    pub fn dwell(&self) -> f64 {
        self.dwell
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
    pub fn sample_time(&self) -> f64 {
        self.dwell*self.n_samples as f64
    }
    pub fn duration(&self) -> f64 {
        self.delay + self.sample_time() + self.dead_time
    }
}

/// Acquisition window of n samples spread evenly over the duration.
pub fn make_adc(n_samples:u32,duration:f64,sys:&SystemLimits) -> Result<AdcEvent> {
    if n_samples == 0 {
        return Err(Error::invalid("adc","number of samples must be at least 1"))
    }
    if !(duration.is_finite() && duration > 0.0) {
        return Err(Error::invalid("adc",format!("duration must be positive, got {}",duration)))
    }
    Ok(AdcEvent {
        n_samples,
        dwell:duration/n_samples as f64,
        delay:sys.adc_dead_time,
        dead_time:sys.adc_dead_time,
        freq_offset:0.0,
        phase_offset:0.0,
    })
}

#[test]
fn test(){
    let sys = SystemLimits::default();
    let adc = make_adc(1,1E-3,&sys).unwrap();
    assert_eq!(adc.n_samples(),1);
    assert!((adc.dwell() - 1E-3).abs() < 1E-15);
    assert!((adc.duration() - 1E-3).abs() < 1E-15);
    assert!(make_adc(0,1E-3,&sys).is_err());
    assert!(make_adc(16,0.0,&sys).is_err());
}

use std::fs::File;
use std::io::Read;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// proton gyromagnetic ratio (Hz/T)
pub const GAMMA_HZ_PER_T:f64 = 42.576E6;

pub const DEFAULT_MAX_GRAD_MT_PER_M:f64 = 40.0;
pub const DEFAULT_MAX_SLEW_T_PER_M_PER_S:f64 = 130.0;
pub const DEFAULT_RF_DEAD_TIME:f64 = 100E-6;
pub const DEFAULT_RF_RINGDOWN_TIME:f64 = 30E-6;
pub const DEFAULT_RF_RASTER_TIME:f64 = 1E-6;
pub const DEFAULT_GRAD_RASTER_TIME:f64 = 10E-6;
pub const DEFAULT_ADC_DEAD_TIME:f64 = 0.0;

/*
 Hardware limits table consumed by every event constructor. Gradient quantities are stored
 in gamma-scaled units (Hz/m and Hz/m/s) so that events never need to know about the nucleus.
 */
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SystemLimits {
    pub max_grad:f64,
    pub max_slew:f64,
    pub rf_dead_time:f64,
    pub rf_ringdown_time:f64,
    pub rf_raster_time:f64,
    pub grad_raster_time:f64,
    pub adc_dead_time:f64,
    pub gamma:f64,
}

impl SystemLimits {
    /// Build a limits table from scanner units (mT/m and T/m/s).
    pub fn new(max_grad_mt_per_m:f64,max_slew_t_per_m_per_s:f64,rf_dead_time:f64,rf_ringdown_time:f64,rf_raster_time:f64) -> Result<Self> {
        let gamma = GAMMA_HZ_PER_T;
        let limits = Self {
            max_grad:max_grad_mt_per_m*1E-3*gamma,
            max_slew:max_slew_t_per_m_per_s*gamma,
            rf_dead_time,
            rf_ringdown_time,
            rf_raster_time,
            grad_raster_time:DEFAULT_GRAD_RASTER_TIME,
            adc_dead_time:DEFAULT_ADC_DEAD_TIME,
            gamma,
        };
        limits.validate()?;
        Ok(limits)
    }

    /// gyromagnetic ratio in Hz/uT
    pub fn gamma_hz_per_ut(&self) -> f64 {
        self.gamma*1E-6
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_grad",self.max_grad),
            ("max_slew",self.max_slew),
            ("rf_raster_time",self.rf_raster_time),
            ("grad_raster_time",self.grad_raster_time),
            ("gamma",self.gamma),
        ];
        for (name,value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid("system limits",format!("{} must be positive, got {}",name,value)))
            }
        }
        let non_negative = [
            ("rf_dead_time",self.rf_dead_time),
            ("rf_ringdown_time",self.rf_ringdown_time),
            ("adc_dead_time",self.adc_dead_time),
        ];
        for (name,value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::invalid("system limits",format!("{} must not be negative, got {}",name,value)))
            }
        }
        Ok(())
    }

    pub fn load(limits_file:&Path) -> Result<Self> {
        let mut f = File::open(limits_file).map_err(|e| Error::io(limits_file,e))?;
        let mut json_str = String::new();
        f.read_to_string(&mut json_str).map_err(|e| Error::io(limits_file,e))?;
        let limits:Self = serde_json::from_str(&json_str)
            .map_err(|e| Error::invalid("system limits",e.to_string()))?;
        limits.validate()?;
        Ok(limits)
    }
}

impl Default for SystemLimits {
    fn default() -> Self {
        let gamma = GAMMA_HZ_PER_T;
        Self {
            max_grad:DEFAULT_MAX_GRAD_MT_PER_M*1E-3*gamma,
            max_slew:DEFAULT_MAX_SLEW_T_PER_M_PER_S*gamma,
            rf_dead_time:DEFAULT_RF_DEAD_TIME,
            rf_ringdown_time:DEFAULT_RF_RINGDOWN_TIME,
            rf_raster_time:DEFAULT_RF_RASTER_TIME,
            grad_raster_time:DEFAULT_GRAD_RASTER_TIME,
            adc_dead_time:DEFAULT_ADC_DEAD_TIME,
            gamma,
        }
    }
}

#[test]
fn scanner_units(){
    let sys = SystemLimits::new(40.0,130.0,100E-6,30E-6,1E-6).unwrap();
    assert_eq!(sys,SystemLimits::default());
    assert!((sys.max_grad - 1_703_040.0).abs() < 1E-6);
    assert!((sys.gamma_hz_per_ut() - 42.576).abs() < 1E-12);
}

#[test]
fn rejects_bad_raster(){
    assert!(SystemLimits::new(40.0,130.0,100E-6,30E-6,0.0).is_err());
    assert!(SystemLimits::new(40.0,130.0,-1E-6,30E-6,1E-6).is_err());
}

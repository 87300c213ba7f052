/*
 A pulse (in this module) is a unit-normalized waveform shape with a fixed duration. Shapes
 know nothing about hardware; the event constructors scale them to physical units and check
 them against the system limits.
 */

use crate::pulse_function::{Function, FunctionParams, render_function_vector};
use crate::utils;

pub trait Pulse {
    fn duration(&self) -> f64;
    fn function(&self,raster_time:f64) -> Vec<Function>;
    fn render(&self,raster_time:f64) -> Vec<f64> {
        render_function_vector(&self.function(raster_time))
    }
}

/// rectangular (block) pulse
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct Hardpulse {
    duration:f64
}

impl Hardpulse {
    pub fn new(duration:f64) -> Hardpulse {
        Hardpulse{duration}
    }
}

impl Pulse for Hardpulse {
    fn duration(&self) -> f64 {
        self.duration
    }
    fn function(&self,raster_time:f64) -> Vec<Function>{
        let n = utils::sec_to_samples(self.duration, raster_time);
        vec![Function::Plateau(FunctionParams::new(n,1.0))]
    }
}

#[derive(Clone,Copy,Debug,PartialEq)]
pub struct SincPulse {
    duration:f64,
    time_bw_product:f64,
    apodization:f64,
}

impl SincPulse {
    pub fn new(duration:f64,time_bw_product:f64,apodization:f64) -> Self{
        Self {
            duration,
            time_bw_product,
            apodization
        }
    }
}

impl Pulse for SincPulse {
    fn duration(&self) -> f64 {
        self.duration
    }
    fn function(&self, raster_time:f64) -> Vec<Function> {
        let n = utils::sec_to_samples(self.duration, raster_time);
        let p = FunctionParams::new(n,1.0);
        vec![
            Function::Sinc(self.time_bw_product,self.apodization,p),
        ]
    }
}

#[test]
fn test(){
    let h = Hardpulse::new(5E-3);
    let shape = h.render(1E-6);
    assert_eq!(shape.len(),5000);
    assert!(shape.iter().all(|v| *v == 1.0));

    let s = SincPulse::new(2.5E-3,3.0,0.0);
    assert!((s.duration() - 2.5E-3).abs() < 1E-15);
    assert_eq!(s.render(1E-6).len(),2500);
}

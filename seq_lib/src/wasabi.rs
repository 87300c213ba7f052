/*
 WASABI: simultaneous mapping of water shift and B1 (Schuenke et al., MRM 77(2), 2017).

 For every frequency offset of the sweep the longitudinal magnetization is first reset by a
 train of 90 degree excitations, each followed by a spoiler, then left to recover, saturated
 by a short block pulse at the offset and spoiled again before a pseudo acquisition marks the
 end of the measurement. An optional unsaturated M0 measurement precedes the sweep.
 */

use std::f64::consts::PI;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use seq_tools::acq_event::{make_adc, AdcEvent};
use seq_tools::rf_event::{make_block_pulse, make_sinc_pulse, RfEvent};
use seq_tools::seq_event::make_delay;
use seq_tools::{Sequence, SystemLimits};
use crate::offsets::{offsets, Offset};
use crate::phase::PhaseAccumulator;
use crate::pulse_sequence::{Build, Initialize};
use crate::spoil::{SpoilGradients, SPOIL_DURATION, SPOIL_LEVELS, SPOIL_RISE_TIME};
use crate::Result;

/// Excitation + spoiler repetitions that destroy the magnetization before each recovery.
/// Six repetitions run the spoiler rotation through one full period.
pub const EXCITATION_SPOIL_REPEATS:usize = 6;
pub const SETTLE_DELAY:f64 = 1E-6;
pub const EXCITATION_FLIP_ANGLE:f64 = PI/2.0;
pub const EXCITATION_DURATION:f64 = 2.5E-3;
pub const EXCITATION_TIME_BW_PRODUCT:f64 = 3.0;
pub const PSEUDO_ADC_SAMPLES:u32 = 1;
pub const PSEUDO_ADC_DURATION:f64 = 1E-3;

pub const OFFSETS_DEFINITION:&str = "offsets_ppm";
pub const M0_DEFINITION:&str = "run_m0_scan";

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct WasabiParams {
    pub name:String,
    /// sweep half width (ppm)
    pub offset_range:f64,
    /// number of measurements, not counting M0
    pub num_offsets:usize,
    pub run_m0_scan:bool,
    /// recovery time between scans (s)
    pub t_rec:f64,
    /// recovery time before the M0 scan (s)
    pub m0_t_rec:f64,
    /// mean saturation pulse B1 (uT)
    pub sat_b1:f64,
    /// saturation pulse duration (s)
    pub t_p:f64,
    /// delay between saturation pulses (s)
    pub t_d:f64,
    pub n_pulses:usize,
    /// static field strength (T)
    pub b0:f64,
    /// spoil between the saturation train and the acquisition
    pub spoiling:bool,
    pub spoil_delay:f64,
    /// spoiler levels as fractions of the maximum gradient
    pub spoil_levels:[f64;3],
}

impl Initialize for WasabiParams {
    fn default() -> Self {
        WasabiParams::at_field_strength(3.0)
    }
}

impl WasabiParams {
    /// Recommended protocol for a field strength: B1 = 1.25 uT * B0 and t_p = 15 ms / B0.
    pub fn at_field_strength(b0:f64) -> Self {
        WasabiParams {
            name:String::from("wasabi"),
            offset_range:2.0,
            num_offsets:21,
            run_m0_scan:true,
            t_rec:2.0,
            m0_t_rec:12.0,
            sat_b1:1.25*b0,
            t_p:15E-3/b0,
            t_d:0.0,
            n_pulses:1,
            b0,
            spoiling:true,
            spoil_delay:1E-3,
            spoil_levels:SPOIL_LEVELS,
        }
    }
    /// flip angle of the saturation block pulse (rad)
    pub fn sat_flip_angle(&self,gamma_hz_per_ut:f64) -> f64 {
        self.sat_b1*gamma_hz_per_ut*2.0*PI*self.t_p
    }
}

#[derive(Clone,Debug)]
pub struct WasabiEvents {
    excitation:RfEvent,
    saturation:RfEvent,
    spoilers:SpoilGradients,
    pseudo_adc:AdcEvent,
}

#[derive(Clone,Debug)]
pub struct Wasabi {
    params:WasabiParams,
    offsets:Vec<Offset>,
    events:WasabiEvents,
}

impl Wasabi {
    /// Compute the sweep and build every template event. The first event that violates the
    /// system limits aborts construction.
    pub fn new(params:WasabiParams,system:&SystemLimits) -> Result<Wasabi> {
        // the only check made here rather than in the event factory, which never sees the count
        if params.num_offsets < 1 {
            return Err(seq_tools::Error::InvalidParameter{
                event:"offset sweep",
                reason:String::from("at least one offset is required")
            }.into())
        }
        let offsets = offsets(params.offset_range,params.num_offsets,system.gamma_hz_per_ut(),params.b0);
        let events = Self::events(&params,system)?;
        Ok(Self {
            params,
            offsets,
            events,
        })
    }

    fn events(params:&WasabiParams,sys:&SystemLimits) -> Result<WasabiEvents> {
        let saturation = make_block_pulse(params.sat_flip_angle(sys.gamma_hz_per_ut()),params.t_p,sys)?;
        let spoilers = SpoilGradients::new(&params.spoil_levels,SPOIL_DURATION,SPOIL_RISE_TIME,sys)?;
        let excitation = make_sinc_pulse(EXCITATION_FLIP_ANGLE,EXCITATION_DURATION,EXCITATION_TIME_BW_PRODUCT,0.0,sys)?;
        // marks the end of a measurement, never played out as a readout
        let pseudo_adc = make_adc(PSEUDO_ADC_SAMPLES,PSEUDO_ADC_DURATION,sys)?;
        Ok(WasabiEvents {
            excitation,
            saturation,
            spoilers,
            pseudo_adc,
        })
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    fn baseline(&self,seq:&mut Sequence) -> Result<()> {
        seq.add(make_delay(self.params.m0_t_rec)?)?;
        seq.add(self.events.pseudo_adc)?;
        Ok(())
    }

    fn excitation_spoil(&self,seq:&mut Sequence) -> Result<()> {
        let spoil_delay = make_delay(self.params.spoil_delay)?;
        for i in 0..EXCITATION_SPOIL_REPEATS {
            seq.add(self.events.excitation.clone())?;
            seq.add(spoil_delay)?;
            seq.add_block(self.events.spoilers.rotated(i))?;
            seq.add(spoil_delay)?;
        }
        Ok(())
    }

    fn saturation_train(&self,seq:&mut Sequence,offset:&Offset,phase:&mut PhaseAccumulator) -> Result<()> {
        phase.reset();
        for n in 0..self.params.n_pulses {
            let pulse = self.events.saturation.with_offsets(offset.hz,phase.phase());
            seq.add(pulse.clone())?;
            phase.advance(offset.hz,&pulse);
            if n + 1 < self.params.n_pulses {
                seq.add(make_delay(self.params.t_d)?)?;
            }
        }
        Ok(())
    }

    fn post_spoil(&self,seq:&mut Sequence) -> Result<()> {
        let spoil_delay = make_delay(self.params.spoil_delay)?;
        seq.add(spoil_delay)?;
        seq.add_block(self.events.spoilers.primary())?;
        seq.add(spoil_delay)?;
        Ok(())
    }

    fn measure_offset(&self,seq:&mut Sequence,offset:&Offset,phase:&mut PhaseAccumulator) -> Result<()> {
        seq.add(make_delay(SETTLE_DELAY)?)?;
        self.excitation_spoil(seq)?;
        seq.add(make_delay(self.params.t_rec)?)?;
        self.saturation_train(seq,offset,phase)?;
        if self.params.spoiling {
            self.post_spoil(seq)?;
        }
        seq.add(self.events.pseudo_adc)?;
        Ok(())
    }

    fn finalize(&self,seq:&mut Sequence) {
        let ppm:Vec<f64> = self.offsets.iter().map(|o| o.ppm).collect();
        seq.set_definition_values(OFFSETS_DEFINITION,&ppm);
        seq.set_definition(M0_DEFINITION,if self.params.run_m0_scan {"True"} else {"False"});
    }
}

impl Build for Wasabi {
    fn name(&self) -> String {
        self.params.name.clone()
    }
    fn compose(&self) -> Result<Sequence> {
        let mut seq = Sequence::new();
        if self.params.run_m0_scan {
            debug!("adding m0 scan");
            self.baseline(&mut seq)?;
        }
        let mut phase = PhaseAccumulator::new();
        let n = self.offsets.len();
        for (i,offset) in self.offsets.iter().enumerate() {
            self.measure_offset(&mut seq,offset,&mut phase)?;
            info!("{} / {} : offset {:.3} ppm ({:.3} Hz)",i + 1,n,offset.ppm,offset.hz);
        }
        self.finalize(&mut seq);
        info!("{} composed: {} blocks, {:.3} s",self.params.name,seq.len(),seq.duration());
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;
    use seq_tools::gradient_event::Channel;

    fn params() -> WasabiParams {
        WasabiParams::default()
    }

    #[test]
    fn field_strength_presets(){
        let p = WasabiParams::at_field_strength(3.0);
        assert!((p.sat_b1 - 3.75).abs() < 1E-12);
        assert!((p.t_p - 5E-3).abs() < 1E-12);
        let p7 = WasabiParams::at_field_strength(7.0);
        assert!((p7.sat_b1 - 8.75).abs() < 1E-12);
    }

    #[test]
    fn per_offset_template(){
        let mut p = params();
        p.num_offsets = 1;
        p.run_m0_scan = false;
        let seq = Wasabi::new(p,&SystemLimits::default()).unwrap().compose().unwrap();
        let b = seq.blocks();
        assert_eq!(b.len(),31);
        assert!(b[0].is_delay());
        for i in 0..EXCITATION_SPOIL_REPEATS {
            let k = 1 + 4*i;
            assert!(b[k].rf().is_some());
            assert!(b[k+1].is_delay());
            assert!(Channel::ALL.iter().all(|c| b[k+2].grad(*c).is_some()));
            assert!(b[k+3].is_delay());
        }
        assert!((b[25].duration() - 2.0).abs() < 1E-12);
        let sat = b[26].rf().unwrap();
        assert!((sat.waveform_duration() - 5E-3).abs() < 1E-12);
        assert!(b[27].is_delay());
        let primary:Vec<f64> = Channel::ALL.iter().map(|c| b[28].grad(*c).unwrap().amplitude()).collect();
        assert!(primary.iter().all(|a| (a - primary[0]).abs() < 1E-9));
        assert!(b[29].is_delay());
        assert!(b[30].adc().is_some());
    }

    #[test]
    fn excitation_spoilers_follow_rotation(){
        let mut p = params();
        p.num_offsets = 1;
        p.run_m0_scan = false;
        let sys = SystemLimits::default();
        let seq = Wasabi::new(p,&sys).unwrap().compose().unwrap();
        let x_levels:Vec<f64> = (0..EXCITATION_SPOIL_REPEATS)
            .map(|i| seq.blocks()[3 + 4*i].grad(Channel::X).unwrap().amplitude()/sys.max_grad)
            .collect();
        let expected = [0.8,-0.7,0.6,0.8,0.6,-0.7];
        for (a,e) in x_levels.iter().zip(expected) {
            assert!((a - e).abs() < 1E-12,"{:?}",x_levels);
        }
    }

    #[test]
    fn saturation_phase_is_carried_and_reset(){
        let mut p = params();
        p.num_offsets = 3;
        p.n_pulses = 3;
        p.t_d = 1E-3;
        p.run_m0_scan = false;
        let w = Wasabi::new(p,&SystemLimits::default()).unwrap();
        let seq = w.compose().unwrap();
        let pulses:Vec<&RfEvent> = seq.blocks().iter()
            .filter_map(|b| b.rf())
            .filter(|rf| rf.signal().len() == 5000)
            .collect();
        assert_eq!(pulses.len(),9);
        for (k,o) in w.offsets().iter().enumerate() {
            let train = &pulses[3*k..3*k+3];
            assert_eq!(train[0].phase_offset(),0.0);
            for (n,rf) in train.iter().enumerate() {
                assert_eq!(rf.freq_offset(),o.hz);
                let expected = (n as f64*o.hz*TAU*5E-3).rem_euclid(TAU);
                assert!((rf.phase_offset() - expected).abs() < 1E-9);
            }
        }
    }

    #[test]
    fn zero_offsets_rejected(){
        let mut p = params();
        p.num_offsets = 0;
        assert!(Wasabi::new(p,&SystemLimits::default()).is_err());
    }

    #[test]
    fn negative_recovery_fails_at_the_delay(){
        let mut p = params();
        p.t_rec = -1.0;
        let w = Wasabi::new(p,&SystemLimits::default()).unwrap();
        let e = w.compose().unwrap_err();
        assert!(matches!(e,crate::Error::Seq(seq_tools::Error::InvalidParameter{event:"delay",..})));
    }
}

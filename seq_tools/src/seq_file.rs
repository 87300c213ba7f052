/*
 Pulseq version 1.2 text serialization. Events are stored once per unique parameter set in
 their library section and referenced from the block table by 1-based id. RF waveforms go to
 the shape library as normalized magnitude and phase (in turns), compressed with the
 derivative run-length scheme of the format.
 */

use std::f64::consts::PI;
use std::fmt::Write;
use indexmap::IndexMap;
use crate::acq_event::AdcEvent;
use crate::gradient_event::{Channel, GradEvent};
use crate::rf_event::RfEvent;
use crate::seq_event::DelayEvent;
use crate::sequence::Sequence;
use crate::utils::{format_g, sec_to_ns, sec_to_us};

pub const VERSION_MAJOR:u32 = 1;
pub const VERSION_MINOR:u32 = 2;
pub const VERSION_REVISION:u32 = 1;

pub const BLOCK_FORMAT_V12:&str = "# Format of blocks:\n#  #  D RF  GX  GY  GZ ADC";

const SHAPE_PRECISION:usize = 9;
const VALUE_PRECISION:usize = 6;

// 1-based ids, 0 means "no event"
#[derive(Default)]
struct EventLibrary {
    rows:IndexMap<String,usize>
}

impl EventLibrary {
    fn find_or_insert(&mut self,row:String) -> usize {
        let next = self.rows.len() + 1;
        *self.rows.entry(row).or_insert(next)
    }
    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    fn write_rows(&self,out:&mut String) {
        for (row,id) in self.rows.iter() {
            let _ = writeln!(out,"{} {}",id,row);
        }
    }
}

#[derive(Default)]
struct Libraries {
    shapes:EventLibrary,
    rf:EventLibrary,
    trap:EventLibrary,
    adc:EventLibrary,
    delays:EventLibrary,
}

impl Libraries {
    fn register_shape(&mut self,samples:&[f64]) -> usize {
        let compressed = compress_shape(samples);
        let mut txt = format!("num_samples {}\n",samples.len());
        for v in compressed.iter() {
            let _ = writeln!(txt,"{}",format_g(*v,SHAPE_PRECISION));
        }
        self.shapes.find_or_insert(txt)
    }
    fn register_rf(&mut self,rf:&RfEvent) -> usize {
        let amplitude = rf.amplitude();
        let (magnitude,phase):(Vec<f64>,Vec<f64>) = rf.signal().iter().map(|s| {
            let m = if amplitude > 0.0 {s.abs()/amplitude} else {0.0};
            // real waveform: negative lobes are half a turn out of phase
            let p = if *s < 0.0 {0.5} else {0.0};
            (m,p)
        }).unzip();
        let mag_id = self.register_shape(&magnitude);
        let phase_id = self.register_shape(&phase);
        let row = format!("{:>12} {} {} {} {} {}",
            format_g(amplitude,VALUE_PRECISION),
            mag_id,
            phase_id,
            sec_to_us(rf.delay()).round(),
            format_g(rf.freq_offset(),VALUE_PRECISION),
            format_g(wrap_phase(rf.phase_offset()),VALUE_PRECISION),
        );
        self.rf.find_or_insert(row)
    }
    fn register_trap(&mut self,g:&GradEvent) -> usize {
        let row = format!("{:>12} {:>3} {:>4} {:>3} {:>3}",
            format_g(g.amplitude(),VALUE_PRECISION),
            sec_to_us(g.rise_time()).round(),
            sec_to_us(g.flat_time()).round(),
            sec_to_us(g.fall_time()).round(),
            sec_to_us(g.delay()).round(),
        );
        self.trap.find_or_insert(row)
    }
    fn register_adc(&mut self,adc:&AdcEvent) -> usize {
        let row = format!("{} {} {} {} {}",
            adc.n_samples(),
            sec_to_ns(adc.dwell()).round(),
            sec_to_us(adc.delay()).round(),
            format_g(adc.freq_offset(),VALUE_PRECISION),
            format_g(wrap_phase(adc.phase_offset()),VALUE_PRECISION),
        );
        self.adc.find_or_insert(row)
    }
    fn register_delay(&mut self,d:&DelayEvent) -> usize {
        self.delays.find_or_insert(format!("{}",sec_to_us(d.duration()).round()))
    }
}

fn wrap_phase(phase:f64) -> f64 {
    phase.rem_euclid(2.0*PI)
}

/// Derivative run-length compression: runs of equal increments become `value value count-2`.
pub fn compress_shape(samples:&[f64]) -> Vec<f64> {
    let data:Vec<f64> = samples.iter().enumerate().map(|(i,s)| {
        if i == 0 {*s} else {s - samples[i-1]}
    }).collect();
    let mut out = Vec::<f64>::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        let mut j = i + 1;
        while j < data.len() && (data[j] - data[j-1]).abs() <= 1E-8 {
            j += 1;
        }
        let run = j - i;
        out.push(data[i]);
        if run >= 2 {
            out.push(data[i]);
            out.push((run - 2) as f64);
        }
        i = j;
    }
    out
}

pub fn render(seq:&Sequence) -> String {
    let mut libs = Libraries::default();
    let mut block_rows = Vec::<String>::with_capacity(seq.len());
    for (i,block) in seq.blocks().iter().enumerate() {
        let delay = block.delay().map(|d| libs.register_delay(d)).unwrap_or(0);
        let rf = block.rf().map(|rf| libs.register_rf(rf)).unwrap_or(0);
        let [gx,gy,gz] = Channel::ALL.map(|c| block.grad(c).map(|g| libs.register_trap(g)).unwrap_or(0));
        let adc = block.adc().map(|adc| libs.register_adc(adc)).unwrap_or(0);
        block_rows.push(format!("{:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3}",i+1,delay,rf,gx,gy,gz,adc));
    }

    let mut out = String::new();
    out.push_str("# Pulseq sequence file\n# Created by seq_tools\n\n");
    let _ = writeln!(out,"[VERSION]\nmajor {}\nminor {}\nrevision {}\n",VERSION_MAJOR,VERSION_MINOR,VERSION_REVISION);

    if !seq.definitions().is_empty() {
        out.push_str("[DEFINITIONS]\n");
        for (key,value) in seq.definitions().iter() {
            let _ = writeln!(out,"{} {}",key,value);
        }
        out.push('\n');
    }

    let _ = writeln!(out,"{}\n[BLOCKS]",BLOCK_FORMAT_V12);
    for row in block_rows.iter() {
        out.push_str(row);
        out.push('\n');
    }
    out.push('\n');

    if !libs.rf.is_empty() {
        out.push_str("# Format of RF events:\n# id amplitude mag_id phase_id delay freq phase\n# ..        Hz   ....     ....    us   Hz   rad\n[RF]\n");
        libs.rf.write_rows(&mut out);
        out.push('\n');
    }
    if !libs.trap.is_empty() {
        out.push_str("# Format of trapezoid gradients:\n# id amplitude rise flat fall delay\n# ..      Hz/m   us   us   us    us\n[TRAP]\n");
        libs.trap.write_rows(&mut out);
        out.push('\n');
    }
    if !libs.adc.is_empty() {
        out.push_str("# Format of ADC events:\n# id num dwell delay freq phase\n# ..  ..    ns    us   Hz   rad\n[ADC]\n");
        libs.adc.write_rows(&mut out);
        out.push('\n');
    }
    if !libs.delays.is_empty() {
        out.push_str("# Format of delays:\n# id delay (us)\n[DELAYS]\n");
        libs.delays.write_rows(&mut out);
        out.push('\n');
    }
    if !libs.shapes.is_empty() {
        out.push_str("# Sequence Shapes\n[SHAPES]\n\n");
        for (txt,id) in libs.shapes.rows.iter() {
            let _ = writeln!(out,"shape_id {}\n{}",id,txt);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acq_event::make_adc;
    use crate::gradient_event::make_trapezoid;
    use crate::hardware_constants::SystemLimits;
    use crate::rf_event::make_block_pulse;
    use crate::seq_event::make_delay;

    #[test]
    fn compression(){
        assert_eq!(compress_shape(&vec![1.0;5000]),vec![1.0,0.0,0.0,4997.0]);
        assert_eq!(compress_shape(&vec![0.0;3]),vec![0.0,0.0,1.0]);
        assert_eq!(compress_shape(&[0.0,1.0,3.0]),vec![0.0,1.0,2.0]);
    }

    #[test]
    fn identical_events_are_stored_once(){
        let sys = SystemLimits::default();
        let mut seq = Sequence::new();
        let rf = make_block_pulse(1.0,1E-3,&sys).unwrap();
        let g = make_trapezoid(Channel::X,1E5,5.5E-3,1E-3,&sys).unwrap();
        seq.add(rf.clone()).unwrap();
        seq.add(rf.with_offsets(100.0,0.0)).unwrap();
        seq.add(rf.clone()).unwrap();
        seq.add(make_delay(1E-3).unwrap()).unwrap();
        seq.add(make_delay(1E-3).unwrap()).unwrap();
        seq.add(g).unwrap();
        seq.add(make_adc(1,1E-3,&sys).unwrap()).unwrap();
        seq.set_definition("run_m0_scan","True");
        let txt = render(&seq);

        assert!(txt.contains("[VERSION]\nmajor 1\nminor 2\nrevision 1\n"));
        assert!(txt.contains("[DEFINITIONS]\nrun_m0_scan True\n"));
        let blocks:Vec<&str> = txt.lines()
            .skip_while(|l| *l != "[BLOCKS]").skip(1)
            .take_while(|l| !l.is_empty()).collect();
        assert_eq!(blocks.len(),7);
        assert_eq!(blocks[0].split_whitespace().collect::<Vec<_>>(),vec!["1","0","1","0","0","0","0"]);
        assert_eq!(blocks[1].split_whitespace().collect::<Vec<_>>(),vec!["2","0","2","0","0","0","0"]);
        assert_eq!(blocks[2].split_whitespace().collect::<Vec<_>>(),vec!["3","0","1","0","0","0","0"]);
        assert_eq!(blocks[4].split_whitespace().collect::<Vec<_>>(),vec!["5","1","0","0","0","0","0"]);
        assert_eq!(blocks[5].split_whitespace().collect::<Vec<_>>(),vec!["6","0","0","1","0","0","0"]);
        assert_eq!(blocks[6].split_whitespace().collect::<Vec<_>>(),vec!["7","0","0","0","0","0","1"]);
        // magnitude and phase shape shared by both rf rows
        assert_eq!(txt.matches("shape_id").count(),2);
        assert!(txt.contains("[DELAYS]\n1 1000\n"));
    }
}

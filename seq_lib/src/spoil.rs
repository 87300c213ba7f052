use seq_tools::gradient_event::{make_trapezoid, Channel, GradEvent};
use seq_tools::{SeqEvent, SystemLimits};
use crate::Result;

/// Spoiler magnitude levels as fractions of the maximum gradient amplitude.
pub const SPOIL_LEVELS:[f64;3] = [0.8,-0.7,0.6];
pub const SPOIL_DURATION:f64 = 5.5E-3;
pub const SPOIL_RISE_TIME:f64 = 1E-3;

/*
 Assignment of the three spoiler levels to the (x, y, z) axes. The triples are cyclic
 rotations of one another so that no axis always carries the same gradient strength and
 residual coherences from consecutive excitations do not add up.
 */
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum SpoilTriple {
    T0,
    T1,
    T2,
}

impl SpoilTriple {
    /// Select the triple for repetition i. The `i % 3` test takes precedence over `i % 2`,
    /// giving the cycle T0 T2 T1 T0 T1 T2 (period 6); it is not a plain round robin.
    pub fn select(i:usize) -> SpoilTriple {
        if i % 3 == 0 {
            SpoilTriple::T0
        }else if i % 2 == 0 {
            SpoilTriple::T1
        }else {
            SpoilTriple::T2
        }
    }
    /// index into the level table for the x, y and z axis
    pub fn levels(&self) -> [usize;3] {
        match self {
            SpoilTriple::T0 => [0,1,2],
            SpoilTriple::T1 => [2,0,1],
            SpoilTriple::T2 => [1,2,0],
        }
    }
}

/// Precomputed spoiler trapezoids, one per (level, axis).
#[derive(Debug,Clone)]
pub struct SpoilGradients {
    table:[[GradEvent;3];3]
}

impl SpoilGradients {
    pub fn new(levels:&[f64;3],duration:f64,rise_time:f64,sys:&SystemLimits) -> Result<Self> {
        let mut built = Vec::<[GradEvent;3]>::with_capacity(3);
        for level in levels.iter() {
            let amplitude = level*sys.max_grad;
            let x = make_trapezoid(Channel::X,amplitude,duration,rise_time,sys)?;
            let y = make_trapezoid(Channel::Y,amplitude,duration,rise_time,sys)?;
            let z = make_trapezoid(Channel::Z,amplitude,duration,rise_time,sys)?;
            built.push([x,y,z]);
        }
        Ok(Self {
            table:[built[0],built[1],built[2]]
        })
    }
    pub fn gradient(&self,level:usize,channel:Channel) -> GradEvent {
        self.table[level][channel.index()]
    }
    fn group(&self,levels:[usize;3]) -> Vec<SeqEvent> {
        Channel::ALL.iter().zip(levels).map(|(c,l)| SeqEvent::Grad(self.gradient(l,*c))).collect()
    }
    /// simultaneous x/y/z spoiler for repetition i
    pub fn rotated(&self,i:usize) -> Vec<SeqEvent> {
        self.group(SpoilTriple::select(i).levels())
    }
    /// the first level on every axis
    pub fn primary(&self) -> Vec<SeqEvent> {
        self.group([0,0,0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SpoilTriple::*;

    #[test]
    fn rotation_cycle(){
        let cycle:Vec<SpoilTriple> = (0..9).map(SpoilTriple::select).collect();
        assert_eq!(cycle,vec![T0,T2,T1,T0,T1,T2,T0,T2,T1]);
    }

    #[test]
    fn triples_are_rotations(){
        for t in [T0,T1,T2] {
            let mut l = t.levels();
            l.sort();
            assert_eq!(l,[0,1,2]);
        }
        // every axis sees every level across the three triples
        for axis in 0..3 {
            let mut seen:Vec<usize> = [T0,T1,T2].iter().map(|t| t.levels()[axis]).collect();
            seen.sort();
            assert_eq!(seen,vec![0,1,2]);
        }
    }

    #[test]
    fn rotated_groups(){
        let sys = SystemLimits::default();
        let s = SpoilGradients::new(&SPOIL_LEVELS,SPOIL_DURATION,SPOIL_RISE_TIME,&sys).unwrap();
        let amps = |events:Vec<SeqEvent>| -> Vec<f64> {
            events.iter().map(|e| match e {
                SeqEvent::Grad(g) => g.amplitude()/sys.max_grad,
                _ => panic!("spoiler holds only gradients")
            }).collect()
        };
        let close = |a:Vec<f64>,b:[f64;3]| a.iter().zip(b).all(|(x,y)| (x - y).abs() < 1E-12);
        assert!(close(amps(s.rotated(0)),[0.8,-0.7,0.6]));
        assert!(close(amps(s.rotated(1)),[-0.7,0.6,0.8]));
        assert!(close(amps(s.rotated(2)),[0.6,0.8,-0.7]));
        assert!(close(amps(s.primary()),[0.8,0.8,0.8]));
    }

    #[test]
    fn level_above_max_grad(){
        let sys = SystemLimits::default();
        let e = SpoilGradients::new(&[1.2,-0.7,0.6],SPOIL_DURATION,SPOIL_RISE_TIME,&sys).unwrap_err();
        assert!(matches!(e,crate::Error::Seq(seq_tools::Error::HardwareLimit{..})));
    }
}

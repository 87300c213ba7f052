use std::collections::HashSet;
use crate::acq_event::AdcEvent;
use crate::gradient_event::{Channel, GradEvent};
use crate::rf_event::RfEvent;
use crate::{Error, Result};

#[derive(Clone,Copy,Debug,PartialEq)]
pub struct DelayEvent {
    delay:f64
}

impl DelayEvent {
    pub fn duration(&self) -> f64 {
        self.delay
    }
}

/// A pure wait. Zero-length delays are allowed and produce an empty block.
pub fn make_delay(duration:f64) -> Result<DelayEvent> {
    if !(duration.is_finite() && duration >= 0.0) {
        return Err(Error::invalid("delay",format!("duration must be finite and not negative, got {}",duration)))
    }
    Ok(DelayEvent{delay:duration})
}

#[derive(Clone,Debug,PartialEq)]
pub enum SeqEvent {
    Rf(RfEvent),
    Grad(GradEvent),
    Adc(AdcEvent),
    Delay(DelayEvent),
}

impl SeqEvent {
    pub fn duration(&self) -> f64 {
        match self {
            SeqEvent::Rf(rf) => rf.duration(),
            SeqEvent::Grad(g) => g.duration(),
            SeqEvent::Adc(adc) => adc.duration(),
            SeqEvent::Delay(d) => d.duration(),
        }
    }
    fn channel(&self) -> Option<String> {
        match self {
            SeqEvent::Rf(_) => Some(String::from("rf")),
            SeqEvent::Grad(g) => Some(g.channel().to_string()),
            SeqEvent::Adc(_) => Some(String::from("adc")),
            // delays only stretch the block
            SeqEvent::Delay(_) => None,
        }
    }
}

impl From<RfEvent> for SeqEvent {
    fn from(e:RfEvent) -> Self { SeqEvent::Rf(e) }
}

impl From<GradEvent> for SeqEvent {
    fn from(e:GradEvent) -> Self { SeqEvent::Grad(e) }
}

impl From<AdcEvent> for SeqEvent {
    fn from(e:AdcEvent) -> Self { SeqEvent::Adc(e) }
}

impl From<DelayEvent> for SeqEvent {
    fn from(e:DelayEvent) -> Self { SeqEvent::Delay(e) }
}

/// Events that start together. A block lasts as long as its longest event.
#[derive(Clone,Debug,PartialEq)]
pub struct Block {
    events:Vec<SeqEvent>
}

impl Block {
    pub fn new(index:usize,events:Vec<SeqEvent>) -> Result<Block> {
        let mut occupied = HashSet::<String>::new();
        for channel in events.iter().filter_map(|e| e.channel()) {
            if !occupied.insert(channel.clone()) {
                return Err(Error::ChannelConflict{block:index,channel})
            }
        }
        Ok(Block{events})
    }
    pub fn events(&self) -> &[SeqEvent] {
        &self.events
    }
    pub fn duration(&self) -> f64 {
        self.events.iter().map(|e| e.duration()).fold(0.0,f64::max)
    }
    pub fn rf(&self) -> Option<&RfEvent> {
        self.events.iter().find_map(|e| match e {
            SeqEvent::Rf(rf) => Some(rf),
            _ => None
        })
    }
    pub fn grad(&self,channel:Channel) -> Option<&GradEvent> {
        self.events.iter().find_map(|e| match e {
            SeqEvent::Grad(g) if g.channel() == channel => Some(g),
            _ => None
        })
    }
    pub fn adc(&self) -> Option<&AdcEvent> {
        self.events.iter().find_map(|e| match e {
            SeqEvent::Adc(adc) => Some(adc),
            _ => None
        })
    }
    pub fn delay(&self) -> Option<&DelayEvent> {
        self.events.iter().find_map(|e| match e {
            SeqEvent::Delay(d) => Some(d),
            _ => None
        })
    }
    /// true when the block does nothing but wait
    pub fn is_delay(&self) -> bool {
        !self.events.is_empty() && self.events.iter().all(|e| matches!(e,SeqEvent::Delay(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient_event::make_trapezoid;
    use crate::hardware_constants::SystemLimits;

    #[test]
    fn block_duration_is_longest_event(){
        let sys = SystemLimits::default();
        let g = make_trapezoid(Channel::X,1000.0,5.5E-3,1E-3,&sys).unwrap();
        let d = make_delay(1E-3).unwrap();
        let b = Block::new(0,vec![g.into(),d.into()]).unwrap();
        assert!((b.duration() - 5.5E-3).abs() < 1E-12);
        assert!(!b.is_delay());
        assert!(b.grad(Channel::X).is_some());
        assert!(b.grad(Channel::Y).is_none());
    }

    #[test]
    fn channel_conflict(){
        let sys = SystemLimits::default();
        let g = make_trapezoid(Channel::Z,1000.0,5.5E-3,1E-3,&sys).unwrap();
        let e = Block::new(7,vec![g.into(),g.into()]).unwrap_err();
        assert!(matches!(e,Error::ChannelConflict{block:7,..}));
    }

    #[test]
    fn negative_delay(){
        assert!(make_delay(-1.0).is_err());
        assert!(make_delay(f64::NAN).is_err());
        assert_eq!(make_delay(0.0).unwrap().duration(),0.0);
    }
}

use std::path::Path;
use indexmap::IndexMap;
use tracing::{debug, info};
use crate::seq_event::{Block, SeqEvent};
use crate::seq_file;
use crate::utils::{format_g, write_replace};
use crate::Result;

/** Ordered, append-only list of blocks with a table of named definitions. Blocks are played
 in the order they were added. */
#[derive(Clone,Debug,Default)]
pub struct Sequence {
    blocks:Vec<Block>,
    definitions:IndexMap<String,String>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group of simultaneous events as the next block.
    pub fn add_block(&mut self,events:Vec<SeqEvent>) -> Result<()> {
        let block = Block::new(self.blocks.len(),events)?;
        debug!("block {} added ({:.6} s)",self.blocks.len() + 1,block.duration());
        self.blocks.push(block);
        Ok(())
    }

    /// Append a block holding a single event.
    pub fn add<E:Into<SeqEvent>>(&mut self,event:E) -> Result<()> {
        self.add_block(vec![event.into()])
    }

    pub fn set_definition<V:ToString>(&mut self,key:&str,value:V) {
        self.definitions.insert(key.to_string(),value.to_string());
    }

    /// Store a numeric array as a space separated definition.
    pub fn set_definition_values(&mut self,key:&str,values:&[f64]) {
        let txt:Vec<String> = values.iter().map(|v| format_g(*v,6)).collect();
        self.set_definition(key,txt.join(" "));
    }

    pub fn definition(&self,key:&str) -> Option<&str> {
        self.definitions.get(key).map(|s| s.as_str())
    }
    pub fn definitions(&self) -> &IndexMap<String,String> {
        &self.definitions
    }
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
    /// total play-out time (s)
    pub fn duration(&self) -> f64 {
        self.blocks.iter().map(|b| b.duration()).sum()
    }

    /// Render the sequence and write it to a file. An existing file is only replaced once the
    /// new contents are completely on disk.
    pub fn write(&self,filename:&Path) -> Result<()> {
        let txt = seq_file::render(self);
        write_replace(filename,&txt)?;
        info!("wrote {} blocks ({:.3} s) to {:?}",self.len(),self.duration(),filename);
        Ok(())
    }
}

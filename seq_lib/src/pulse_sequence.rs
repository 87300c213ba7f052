use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use seq_tools::conversion::convert_v12_to_pseudo_v13;
use seq_tools::Sequence;
use crate::{Error, Result};

/// Parameter sets that live in json files.
pub trait Initialize:Serialize + DeserializeOwned + Sized {
    fn default() -> Self;
    fn load(params_file:&Path) -> Result<Self> {
        let mut f = File::open(params_file).map_err(|e| Error::Io{path:params_file.to_owned(),source:e})?;
        let mut json_str = String::new();
        f.read_to_string(&mut json_str).map_err(|e| Error::Io{path:params_file.to_owned(),source:e})?;
        serde_json::from_str(&json_str).map_err(|e| Error::Params{path:params_file.to_owned(),source:e})
    }
    fn write(&self,params_file:&Path) -> Result<()> {
        let str = serde_json::to_string_pretty(self)?;
        let mut f = File::create(params_file).map_err(|e| Error::Io{path:params_file.to_owned(),source:e})?;
        f.write_all(str.as_bytes()).map_err(|e| Error::Io{path:params_file.to_owned(),source:e})?;
        Ok(())
    }
    fn write_default(params_file:&Path) -> Result<()> {
        Self::default().write(params_file)
    }
}

/// A protocol that can be composed into a sequence and exported.
pub trait Build {
    fn name(&self) -> String;
    fn compose(&self) -> Result<Sequence>;
    /** Compose, write <name>.seq to the destination directory and optionally rewrite it as
     pseudo version 1.3. Nothing is written when composition fails. */
    fn seq_export(&self,destination:&Path,pseudo_v13:bool) -> Result<PathBuf> {
        let seq = self.compose()?;
        let filename = destination.join(self.name()).with_extension("seq");
        seq.write(&filename)?;
        if pseudo_v13 {
            convert_v12_to_pseudo_v13(&filename)?;
        }
        info!("{} exported to {:?}",self.name(),filename);
        Ok(filename)
    }
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use seq_lib::pulse_sequence::{Build, Initialize};
use seq_lib::wasabi::{Wasabi, WasabiParams};
use seq_lib::{Error, Result};
use seq_tools::SystemLimits;

#[derive(clap::Parser,Debug)]
struct SeqLibArgs {
    #[command(subcommand)]
    action: Action,
}

#[derive(clap::Subcommand,Debug)]
pub enum Action {
    /// write a default parameter file for a sequence
    NewConfig(NewConfigArgs),
    /// compose a sequence from a parameter file and export it
    Build(BuildArgs),
    ListSequences
}

#[derive(clap::Args,Debug)]
pub struct NewConfigArgs {
    /// sequence alias, see list-sequences
    name:String,
    destination:PathBuf,
    /// derive saturation parameters for this field strength (T)
    #[clap(long)]
    b0:Option<f64>,
}

#[derive(clap::Args,Debug)]
pub struct BuildArgs {
    /// parameter file written by new-config
    config:PathBuf,
    destination:PathBuf,
    /// json hardware limits table, defaults to the built-in scanner limits
    #[clap(short, long)]
    system:Option<PathBuf>,
    /// keep the version 1.2 file instead of rewriting it as pseudo 1.3
    #[clap(long)]
    no_convert:bool,
}

enum Sequence {
    Wasabi,
}

impl Sequence {
    fn list() -> String {
        vec![
            Self::decode(&Self::Wasabi),
        ].join("\n")
    }
    fn encode(name:&str) -> Result<Self> {
        match name {
            "wasabi" => Ok(Self::Wasabi),
            _ => Err(Error::UnknownSequence(name.to_string()))
        }
    }
    fn decode(&self) -> String {
        match &self {
            Self::Wasabi => String::from("wasabi"),
        }
    }
}

fn system_limits(system:Option<&Path>) -> Result<SystemLimits> {
    match system {
        Some(path) => Ok(SystemLimits::load(path)?),
        None => Ok(SystemLimits::default()),
    }
}

fn run(args:SeqLibArgs) -> Result<()> {
    match &args.action {
        Action::ListSequences => {
            println!("{}",Sequence::list());
        }
        Action::NewConfig(args) => {
            match Sequence::encode(&args.name)? {
                Sequence::Wasabi => {
                    let params = match args.b0 {
                        Some(b0) => WasabiParams::at_field_strength(b0),
                        None => WasabiParams::default(),
                    };
                    params.write(&args.destination)?;
                }
            }
            info!("wrote {} parameters to {:?}",args.name,args.destination);
        }
        Action::Build(args) => {
            let sys = system_limits(args.system.as_deref())?;
            let params = WasabiParams::load(&args.config)?;
            let s = Wasabi::new(params,&sys)?;
            s.seq_export(&args.destination,!args.no_convert)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = SeqLibArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}",e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command(){
        let args = SeqLibArgs::try_parse_from(["seq_lib","build","wasabi.json","out"]).unwrap();
        match args.action {
            Action::Build(b) => {
                assert_eq!(b.config,PathBuf::from("wasabi.json"));
                assert_eq!(b.destination,PathBuf::from("out"));
                assert!(b.system.is_none());
                assert!(!b.no_convert);
            }
            other => panic!("unexpected action {:?}",other)
        }
        let args = SeqLibArgs::try_parse_from(
            ["seq_lib","build","wasabi.json","out","--system","limits.json","--no-convert"]
        ).unwrap();
        match args.action {
            Action::Build(b) => {
                assert_eq!(b.system,Some(PathBuf::from("limits.json")));
                assert!(b.no_convert);
            }
            other => panic!("unexpected action {:?}",other)
        }
        assert!(SeqLibArgs::try_parse_from(["seq_lib","build","wasabi.json"]).is_err());
    }

    #[test]
    fn new_config_command(){
        let args = SeqLibArgs::try_parse_from(["seq_lib","new-config","wasabi","wasabi.json","--b0","7"]).unwrap();
        match args.action {
            Action::NewConfig(n) => {
                assert_eq!(n.name,"wasabi");
                assert_eq!(n.destination,PathBuf::from("wasabi.json"));
                assert_eq!(n.b0,Some(7.0));
            }
            other => panic!("unexpected action {:?}",other)
        }
        assert!(matches!(SeqLibArgs::try_parse_from(["seq_lib","list-sequences"]).unwrap().action,Action::ListSequences));
    }

    #[test]
    fn sequence_aliases(){
        assert_eq!(Sequence::list(),"wasabi");
        assert!(matches!(Sequence::encode("wasabi"),Ok(Sequence::Wasabi)));
        assert!(matches!(Sequence::encode("t1"),Err(Error::UnknownSequence(_))));
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use crate::{Error, Result};

pub fn sec_to_us(seconds:f64) -> f64 {
    seconds*1E6
}

pub fn sec_to_ns(seconds:f64) -> f64 {
    seconds*1E9
}

/// number of raster periods in t, rounded to the nearest whole sample
pub fn sec_to_samples(t_seconds:f64,raster_time:f64) -> usize {
    let samples = (t_seconds/raster_time).round();
    if samples <= 0.0 {0} else {samples as usize}
}

/*
 Equivalent of printf's %g: the shortest of fixed or scientific notation for the requested
 number of significant digits, with trailing zeros removed.
 */
pub fn format_g(value:f64,significant:usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return if value == 0.0 {String::from("0")} else {value.to_string()}
    }
    let significant = significant.max(1);
    let sci = format!("{:.*e}",significant - 1,value);
    // exponent after rounding to the requested precision
    let exponent:i32 = match sci.split_once('e') {
        Some((_,exp)) => exp.parse().unwrap_or(0),
        None => 0
    };
    if exponent < -4 || exponent >= significant as i32 {
        let (mantissa,_) = sci.split_once('e').unwrap_or((sci.as_str(),""));
        let mantissa = trim_zeros(mantissa);
        let sign = if exponent < 0 {'-'} else {'+'};
        format!("{}e{}{:02}",mantissa,sign,exponent.abs())
    }else {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}",decimals,value))
    }
}

/*
 Write contents next to path under a hidden temporary name, then rename it over path. Readers
 see either the old file or the complete new one. The temporary file is removed on failure.
 */
pub(crate) fn write_replace(path:&Path,contents:&str) -> Result<()> {
    let tmp = temp_sibling(path).ok_or_else(|| {
        Error::io(path,io::Error::new(io::ErrorKind::InvalidInput,"path has no file name"))
    })?;
    let written = fs::write(&tmp,contents).and_then(|_| fs::rename(&tmp,path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path,e))
    }
    Ok(())
}

fn temp_sibling(path:&Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_string_lossy();
    Some(path.with_file_name(format!(".{}.tmp",name)))
}

fn trim_zeros(s:&str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }else {
        s.to_string()
    }
}

#[test]
fn test(){
    assert_eq!(format_g(-1.7999999999999998,6),"-1.8");
    assert_eq!(format_g(127.728,6),"127.728");
    assert_eq!(format_g(2.0,6),"2");
    assert_eq!(format_g(1703040.0,6),"1.70304e+06");
    assert_eq!(format_g(0.00001,6),"1e-05");
    assert_eq!(format_g(0.0,6),"0");
    assert_eq!(format_g(3.3333333333,9),"3.33333333");
}

#[test]
fn replace_file(){
    let dir = std::env::temp_dir().join(format!("seq_tools_utils_{}",std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("a.seq");
    write_replace(&path,"first version\n").unwrap();
    write_replace(&path,"second\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(),"second\n");
    assert!(!dir.join(".a.seq.tmp").exists());
    // renaming onto a directory fails and leaves no temporary behind
    let target = dir.join("sub");
    fs::create_dir_all(target.join("inner")).unwrap();
    assert!(matches!(write_replace(&target,"x"),Err(Error::Io{..})));
    assert!(!dir.join(".sub.tmp").exists());
    assert!(target.join("inner").is_dir());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rasters(){
    assert_eq!(sec_to_samples(5E-3,1E-6),5000);
    assert_eq!(sec_to_samples(2.5E-3,1E-6),2500);
    assert_eq!(sec_to_samples(-1.0,1E-6),0);
    assert_eq!(sec_to_us(1E-3).round(),1000.0);
}

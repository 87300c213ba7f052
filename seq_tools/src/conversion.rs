/*
 Rewrites a version 1.2 sequence file as "pseudo 1.3": the content stays 1.2 but the version
 block reads 1.3.0 and every block row gets the extension column (always 0) introduced in 1.3.
 Interpreters that only accept 1.3 files can then load it.
 */

use std::fs;
use std::path::Path;
use regex::Regex;
use tracing::info;
use crate::utils::write_replace;
use crate::{Error, Result};

const BLOCK_FORMAT_V13:&str = "# NUM DLY RF  GX  GY  GZ ADC  EXT";
const BLOCK_ROW_V12:&str = r"^\s*\d+(\s+\d+){6}\s*$";
const VERSION_LINE:&str = r"^\s*(major|minor|revision)\s+(\d+)\s*$";

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct FileVersion {
    pub major:u32,
    pub minor:u32,
    pub revision:u32,
}

fn section_name(line:&str) -> Option<&str> {
    let line = line.trim();
    if line.starts_with('[') && line.ends_with(']') {Some(&line[1..line.len()-1])} else {None}
}

fn version_regex() -> Result<Regex> {
    Regex::new(VERSION_LINE).map_err(|e| Error::MalformedFile(e.to_string()))
}

/// Read the [VERSION] section of a sequence file.
pub fn file_version(seq_txt:&str) -> Result<FileVersion> {
    let reg = version_regex()?;
    let mut section = None;
    let mut found = false;
    let mut v = FileVersion{major:0,minor:0,revision:0};
    for line in seq_txt.lines() {
        if let Some(name) = section_name(line) {
            section = Some(name);
            continue
        }
        if section != Some("VERSION") {
            continue
        }
        if let Some(caps) = reg.captures(line) {
            found = true;
            let value:u32 = caps[2].parse().map_err(|_| Error::MalformedFile(format!("bad version line {:?}",line)))?;
            match &caps[1] {
                "major" => v.major = value,
                "minor" => v.minor = value,
                _ => v.revision = value,
            }
        }
    }
    if found {Ok(v)} else {Err(Error::MalformedFile(String::from("no [VERSION] section")))}
}

pub fn convert_text(seq_txt:&str) -> Result<String> {
    let version = file_version(seq_txt)?;
    if (version.major,version.minor) != (1,2) {
        return Err(Error::UnsupportedVersion{found:format!("{}.{}.{}",version.major,version.minor,version.revision)})
    }
    let version_reg = version_regex()?;
    let block_reg = Regex::new(BLOCK_ROW_V12).map_err(|e| Error::MalformedFile(e.to_string()))?;

    let mut out = Vec::<String>::new();
    let mut section:Option<&str> = None;
    for line in seq_txt.lines() {
        if let Some(name) = section_name(line) {
            section = Some(name);
            out.push(line.to_string());
            continue
        }
        let trimmed = line.trim();
        // the block format comment precedes the [BLOCKS] header
        if trimmed.starts_with('#') && trimmed.contains("GX") && trimmed.contains("ADC") && !trimmed.contains("EXT") {
            out.push(BLOCK_FORMAT_V13.to_string());
            continue
        }
        match section {
            Some("VERSION") => {
                match version_reg.captures(line) {
                    Some(caps) if &caps[1] == "minor" => out.push(String::from("minor 3")),
                    Some(caps) if &caps[1] == "revision" => out.push(String::from("revision 0")),
                    _ => out.push(line.to_string()),
                }
            }
            Some("BLOCKS") if !trimmed.is_empty() && !trimmed.starts_with('#') => {
                if !block_reg.is_match(line) {
                    return Err(Error::MalformedFile(format!("unexpected block row {:?}",line)))
                }
                out.push(format!("{} {:>3}",line.trim_end(),0));
            }
            _ => out.push(line.to_string()),
        }
    }
    let mut txt = out.join("\n");
    if seq_txt.ends_with('\n') {
        txt.push('\n');
    }
    Ok(txt)
}

/// Convert the file at src and write the result to dst (which may be src). dst is left untouched
/// unless conversion succeeds.
pub fn convert_v12_to_pseudo_v13_into(src:&Path,dst:&Path) -> Result<()> {
    let txt = fs::read_to_string(src).map_err(|e| Error::io(src,e))?;
    let converted = convert_text(&txt)?;
    write_replace(dst,&converted)?;
    info!("converted {:?} to pseudo version 1.3 at {:?}",src,dst);
    Ok(())
}

/// Convert a version 1.2 file in place.
pub fn convert_v12_to_pseudo_v13(path:&Path) -> Result<()> {
    convert_v12_to_pseudo_v13_into(path,path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const V12:&str = "# Pulseq sequence file\n\n[VERSION]\nmajor 1\nminor 2\nrevision 1\n\n\
        # Format of blocks:\n#  #  D RF  GX  GY  GZ ADC\n[BLOCKS]\n  1   1   0   0   0   0   0\n  2   0   0   0   0   0   1\n\n\
        # Format of delays:\n# id delay (us)\n[DELAYS]\n1 12000000\n";

    #[test]
    fn converts_version_and_blocks(){
        let txt = convert_text(V12).unwrap();
        assert_eq!(file_version(&txt).unwrap(),FileVersion{major:1,minor:3,revision:0});
        assert!(txt.contains(BLOCK_FORMAT_V13));
        let rows:Vec<Vec<&str>> = txt.lines()
            .skip_while(|l| *l != "[BLOCKS]").skip(1)
            .take_while(|l| !l.is_empty())
            .map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(rows,vec![vec!["1","1","0","0","0","0","0","0"],vec!["2","0","0","0","0","0","1","0"]]);
        // other sections pass through untouched
        assert!(txt.contains("[DELAYS]\n1 12000000\n"));
    }

    #[test]
    fn refuses_second_pass(){
        let once = convert_text(V12).unwrap();
        let e = convert_text(&once).unwrap_err();
        assert!(matches!(e,Error::UnsupportedVersion{ref found} if found == "1.3.0"));
    }

    #[test]
    fn missing_version(){
        assert!(matches!(convert_text("[BLOCKS]\n1 0 0 0 0 0 0\n"),Err(Error::MalformedFile(_))));
    }

    #[test]
    fn missing_file(){
        let path = std::env::temp_dir().join("seq_tools_no_such_file.seq");
        assert!(matches!(convert_v12_to_pseudo_v13(&path),Err(Error::Io{..})));
    }

    #[test]
    fn in_place(){
        let dir = std::env::temp_dir().join(format!("seq_tools_convert_{}",std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("in_place.seq");
        fs::write(&path,V12).unwrap();
        convert_v12_to_pseudo_v13(&path).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        assert_eq!(file_version(&once).unwrap().minor,3);
        // a refused conversion leaves the file as it was
        assert!(convert_v12_to_pseudo_v13(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(),once);
        assert_eq!(fs::read_dir(&dir).unwrap().count(),1);
        fs::remove_dir_all(&dir).unwrap();
    }
}

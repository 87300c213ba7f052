/// A point of the offset sweep, both as chemical shift and as absolute frequency.
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Offset {
    pub ppm:f64,
    pub hz:f64,
}

/*
 Evenly spaced chemical shifts over [-range, +range], converted to Hz with
 hz = ppm * gamma (Hz/uT) * field strength (T). The i-th value is computed as
 range*(2i - (n-1))/(n-1) so the sweep is exactly antisymmetric and hits both ends.
 */
pub fn offsets(range_ppm:f64,count:usize,gamma_hz_per_ut:f64,field_strength:f64) -> Vec<Offset> {
    let scale = gamma_hz_per_ut*field_strength;
    let ppm:Vec<f64> = match count {
        0 => vec![],
        1 => vec![0.0],
        _ => {
            let span = (count - 1) as f64;
            (0..count).map(|i| range_ppm*(2.0*i as f64 - span)/span).collect()
        }
    };
    ppm.into_iter().map(|ppm| Offset{ppm,hz:ppm*scale}).collect()
}

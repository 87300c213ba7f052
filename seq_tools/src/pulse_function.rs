use std::f64::consts::PI;

#[derive(Copy,Clone,Debug)]
pub struct FunctionParams {
    pub n_samples:usize,
    pub max_value:f64
}

impl FunctionParams{
    pub fn new(n_samples:usize,max_value:f64) -> Self {
        Self {
            n_samples,
            max_value
        }
    }
}

#[derive(Clone,Debug)]
pub enum Function {
    Plateau(FunctionParams),
    /// apodized sinc with (time-bandwidth product, apodization)
    Sinc(f64,f64,FunctionParams),
}

impl Function {
    pub fn waveform_data(&self) -> Vec<f64>{
        match self {
            Function::Plateau(p) => vec![p.max_value;p.n_samples],
            Function::Sinc(time_bw_product,apodization,p) => {
                sinc(p.max_value, *time_bw_product, *apodization, p.n_samples)
            }
        }
    }
    pub fn n_samples(&self) -> usize {
        match self {
            Function::Plateau(p) => p.n_samples,
            Function::Sinc(_,_,p) => p.n_samples
        }
    }
}

pub fn render_function_vector(functions:&[Function]) -> Vec<f64> {
    let mut waveform = Vec::<f64>::with_capacity(functions.iter().map(|f| f.n_samples()).sum());
    for f in functions.iter(){
        waveform.extend(f.waveform_data());
    }
    waveform
}

/*
 Samples sit at the center of each raster period. The sinc zero crossings are spaced by
 1/bandwidth where bandwidth = time_bw_product/duration, so time_bw_product counts the
 zero crossings across the whole pulse.
 */
fn sinc(amplitude:f64,time_bw_product:f64,apodization:f64,n_samples:usize) -> Vec<f64> {
    let n = n_samples as f64;
    (0..n_samples).map(|i| {
        // time relative to the pulse center in units of the pulse duration
        let tt = ((i as f64) + 0.5)/n - 0.5;
        let window = 1.0 - apodization + apodization*(2.0*PI*tt).cos();
        let x = PI*time_bw_product*tt;
        let s = if x.abs() < 1E-12 {1.0} else {x.sin()/x};
        amplitude*window*s
    }).collect()
}

#[test]
fn test(){
    let p = Function::Plateau(FunctionParams::new(3,2.0));
    assert_eq!(p.waveform_data(),vec![2.0;3]);
    let s = Function::Sinc(3.0,0.0,FunctionParams::new(2500,1.0)).waveform_data();
    assert_eq!(s.len(),2500);
    // symmetric about the center and peaked there
    assert!((s[0] - s[2499]).abs() < 1E-12);
    let max = s.iter().cloned().fold(f64::MIN,f64::max);
    assert!((max - s[1249]).abs() < 1E-12);
    // tbw 3 reaches the first negative lobe
    assert!(s.iter().any(|v| *v < 0.0));
}

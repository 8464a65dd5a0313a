//! Frequency to CV code conversion.

use crate::commands::common::load_setup;
use clap::Args;
use grundton_tracker::CvMapper;
use std::path::PathBuf;

#[derive(Args)]
pub struct CvArgs {
    /// Frequencies in Hz
    #[arg(value_name = "FREQ", required = true)]
    frequencies: Vec<f32>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: CvArgs) -> anyhow::Result<()> {
    let (settings, _) = load_setup(args.config.as_deref())?;
    let cv = CvMapper::new(settings.cv);
    tracing::debug!(f_min = settings.cv.f_min, f_max = settings.cv.f_max, full_scale = cv.full_scale(), "cv range");

    for freq in args.frequencies {
        let code = cv.code(freq);
        println!("{freq:>10.2} Hz -> {code:>5}  ({:.2} Hz)", cv.frequency_at(code));
    }
    Ok(())
}

//! String catalog listing.

use crate::commands::common::load_setup;
use clap::Args;
use grundton_tracker::CvMapper;
use std::path::PathBuf;

#[derive(Args)]
pub struct StringsArgs {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: StringsArgs) -> anyhow::Result<()> {
    let (settings, catalog) = load_setup(args.config.as_deref())?;
    let cv = CvMapper::new(settings.cv);

    println!("String catalog ({} strings, {} selectable pairs)", catalog.len(), catalog.last_base_index() + 1);
    println!();
    println!("  {:>3}  {:<6} {:>9} {:>9}   {:>11}", "#", "name", "low Hz", "high Hz", "CV codes");
    println!("  {}", "-".repeat(46));
    for (i, profile) in catalog.iter().enumerate() {
        println!(
            "  {:>3}  {:<6} {:>9.2} {:>9.2}   {:>4} - {:>4}",
            i,
            profile.name(),
            profile.low_hz(),
            profile.high_hz(),
            cv.code(profile.low_hz()),
            cv.code(profile.high_hz()),
        );
    }
    Ok(())
}

use std::path::PathBuf;

use clap::Parser;

use motiontrace_core::kinematics::Quantity;

#[derive(Parser)]
#[command(
    name = "kinematics",
    version,
    about = "Derives position, velocity or acceleration series from a time,x,y csv"
)]
pub struct Cli {
    /// CSV file with time,x,y rows.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Quantity to print: position-x, position-y, velocity-x, velocity-y,
    /// acceleration-x or acceleration-y.
    #[arg(short, long, default_value = "position-x")]
    pub quantity: Quantity,

    /// Multiply positions by this factor before deriving (e.g. metres per pixel).
    #[arg(long)]
    pub scale: Option<f64>,
}

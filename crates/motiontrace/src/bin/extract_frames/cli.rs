use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "extract-frames",
    version,
    about = "Converts an mp4 video into numbered jpg frames"
)]
pub struct Cli {
    /// Full path to an mp4 file.
    #[arg(short, long)]
    pub infile: PathBuf,

    /// Existing, empty directory to store frames in. Output is nnnnn.jpg starting from 00000.
    #[arg(short, long)]
    pub outdir: PathBuf,

    /// Write into a directory with pre-existing files, overwriting old frames.
    #[arg(short, long)]
    pub force: bool,

    /// Keep every Nth frame.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub skip: u32,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["extract-frames", "-i", "clip.mp4", "-o", "frames", "-f", "-s", "3"])
            .unwrap();
        assert_eq!(cli.infile, PathBuf::from("clip.mp4"));
        assert_eq!(cli.outdir, PathBuf::from("frames"));
        assert!(cli.force);
        assert_eq!(cli.skip, 3);
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["extract-frames", "--infile", "clip.mp4", "--outdir", "frames"]).unwrap();
        assert!(!cli.force);
        assert_eq!(cli.skip, 1);
    }

    #[test]
    fn infile_and_outdir_are_required() {
        let err = Cli::try_parse_from(["extract-frames", "-i", "clip.mp4"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["extract-frames", "-o", "frames"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn skip_must_be_positive() {
        let err = Cli::try_parse_from(["extract-frames", "-i", "clip.mp4", "-o", "frames", "-s", "0"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["extract-frames", "-i", "clip.mp4", "-o", "frames", "-s", "x"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}

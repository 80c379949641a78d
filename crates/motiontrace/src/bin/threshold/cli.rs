use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use motiontrace_core::rect::AxisSpan;

#[derive(Parser, Debug)]
#[command(
    name = "threshold",
    version,
    about = "Calculates the pixel difference threshold of a region between two frames",
    after_help = "Both -x and -y must be provided together or not at all; \
                  without them the region is entered interactively."
)]
pub struct Cli {
    /// Full path to the first frame (also accepted as -p1).
    #[arg(long)]
    pub path1: PathBuf,

    /// Full path to the second frame (also accepted as -p2).
    #[arg(long)]
    pub path2: PathBuf,

    /// X span of the region, format '(x1,x2)'.
    #[arg(short = 'x', long, requires = "dimension_y")]
    pub dimension_x: Option<AxisSpan>,

    /// Y span of the region, format '(y1,y2)'.
    #[arg(short = 'y', long, requires = "dimension_x")]
    pub dimension_y: Option<AxisSpan>,

    /// Save the first frame with the region outlined to this PNG.
    #[arg(long)]
    pub debug_frame: Option<PathBuf>,

    /// TrueType font used to print the threshold on the debug frame.
    #[arg(long, requires = "debug_frame")]
    pub font: Option<PathBuf>,
}

impl Cli {
    /// Parse arguments, accepting the two-letter `-p1`/`-p2` flags.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite `-p1`/`-p2` (optionally `-p1=PATH`) to their long forms; clap short flags are one char.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(s) = arg.to_str() else { return arg };
            for (short, long) in [("-p1", "--path1"), ("-p2", "--path2")] {
                if s == short {
                    return OsString::from(long);
                }
                if let Some(rest) = s.strip_prefix(short).and_then(|r| r.strip_prefix('=')) {
                    return OsString::from(format!("{long}={rest}"));
                }
            }
            arg
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        normalize_args(list.iter().map(OsString::from))
    }

    #[test]
    fn two_letter_flags_are_accepted() {
        let cli = Cli::try_parse_from(args(&[
            "threshold", "-p1", "a.jpg", "-p2=b.jpg", "-x", "(1,5)", "-y", "(2,6)",
        ]))
        .unwrap();
        assert_eq!(cli.path1, PathBuf::from("a.jpg"));
        assert_eq!(cli.path2, PathBuf::from("b.jpg"));
        assert_eq!(cli.dimension_x, Some(AxisSpan { start: 1, end: 5 }));
        assert_eq!(cli.dimension_y, Some(AxisSpan { start: 2, end: 6 }));
    }

    #[test]
    fn region_is_optional() {
        let cli = Cli::try_parse_from(args(&["threshold", "-p1", "a.jpg", "-p2", "b.jpg"])).unwrap();
        assert!(cli.dimension_x.is_none() && cli.dimension_y.is_none());
    }

    #[test]
    fn unpaired_dimension_is_a_usage_error() {
        let err = Cli::try_parse_from(args(&["threshold", "-p1", "a", "-p2", "b", "-x", "(1,2)"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(args(&["threshold", "-p1", "a", "-p2", "b", "-y", "(1,2)"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn malformed_tuple_is_rejected() {
        let err = Cli::try_parse_from(args(&[
            "threshold", "-p1", "a", "-p2", "b", "-x", "(1;2)", "-y", "(1,2)",
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}

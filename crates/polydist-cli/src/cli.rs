use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "polydist - Symmetry-adapted distortion-mode amplitudes for octahedral \
             coordination shells in periodic crystal structures.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Path to the input structure file in POSCAR format.
    #[arg(value_name = "POSCAR")]
    pub structure: PathBuf,

    /// 1-based index of the central atom whose shell is analyzed.
    #[arg(value_name = "ATOM")]
    pub centre: usize,

    /// Load the symmetry basis from a JSON file instead of the built-in
    /// octahedral table.
    #[arg(short, long, value_name = "PATH")]
    pub basis: Option<PathBuf>,

    /// Neighbor-search cutoff radius in angstroms.
    #[arg(short, long, value_name = "FLOAT",
          default_value_t = polydist::analysis::neighbors::DEFAULT_CUTOFF)]
    pub cutoff: f64,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_positional_arguments() {
        let cli = Cli::parse_from(["polydist", "POSCAR", "3"]);
        assert_eq!(cli.structure, PathBuf::from("POSCAR"));
        assert_eq!(cli.centre, 3);
        assert!(cli.basis.is_none());
        assert_eq!(cli.cutoff, polydist::analysis::neighbors::DEFAULT_CUTOFF);
    }

    #[test]
    fn accepts_overrides() {
        let cli = Cli::parse_from([
            "polydist", "POSCAR", "1", "--basis", "modes.json", "--cutoff", "4.2", "-vv",
        ]);
        assert_eq!(cli.basis, Some(PathBuf::from("modes.json")));
        assert_eq!(cli.cutoff, 4.2);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["polydist", "POSCAR", "1", "-q", "-v"]).is_err());
    }

    #[test]
    fn missing_positionals_are_an_error() {
        assert!(Cli::try_parse_from(["polydist", "POSCAR"]).is_err());
    }
}

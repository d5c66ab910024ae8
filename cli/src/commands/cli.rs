use std::ffi::OsString;

use clap::Parser;

/// stdio-sieve has no options of its own: every argument belongs to the
/// wrapped program, including `--help`, `--version` and `--`.
#[derive(Parser, Debug)]
#[command(
    name = "stdio-sieve",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub child_args: Vec<String>,
}

impl Args {
    pub fn from_env() -> Result<Self, clap::Error> {
        Self::parse_passthrough(std::env::args_os())
    }

    /// Parses a full argv (binary name first). A `--` is inserted ahead of
    /// the caller's arguments so clap never interprets any of them.
    pub fn parse_passthrough<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let bin = argv.next().unwrap_or_else(|| OsString::from("stdio-sieve"));

        Self::try_parse_from(
            std::iter::once(bin)
                .chain(std::iter::once(OsString::from("--")))
                .chain(argv),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> Vec<String> {
        Args::parse_passthrough(argv.iter().copied())
            .unwrap()
            .child_args
    }

    #[test]
    fn no_arguments_is_fine() {
        assert!(parse(&["stdio-sieve"]).is_empty());
        assert!(Args::parse_passthrough(Vec::<OsString>::new())
            .unwrap()
            .child_args
            .is_empty());
    }

    #[test]
    fn flags_are_passed_through_untouched() {
        assert_eq!(
            parse(&["stdio-sieve", "--help", "-V", "--port=3000", "serve"]),
            vec!["--help", "-V", "--port=3000", "serve"]
        );
    }

    #[test]
    fn double_dash_is_passed_through() {
        assert_eq!(
            parse(&["stdio-sieve", "--", "run", "--", "x"]),
            vec!["--", "run", "--", "x"]
        );
    }
}

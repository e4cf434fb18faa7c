//! [`Args`] definitions.

use std::ffi::OsString;

use clap::Parser;

/// Server of the employee records management system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    ///
    /// Missing file is not an error: values are taken from `CONF.*`
    /// environment variables or defaults then.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses the command line arguments of the current process.
    ///
    /// # Errors
    ///
    /// If the arguments are malformed, or `--help`/`--version` is requested.
    pub fn parse() -> Result<Self, clap::Error> {
        Self::parse_from(std::env::args_os())
    }

    /// Parses the provided command line arguments, the first one being the
    /// binary name.
    ///
    /// # Errors
    ///
    /// If the arguments are malformed, or `--help`/`--version` is requested.
    pub fn parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }
}

#[cfg(test)]
mod spec {
    use super::Args;

    #[test]
    fn defaults_config_path() {
        let args = Args::parse_from(["application"]).unwrap();

        assert_eq!(args.config, "config.toml");
    }

    #[test]
    fn accepts_short_and_long_config_flags() {
        for flag in ["-c", "--config"] {
            let args =
                Args::parse_from(["application", flag, "/etc/staff.toml"])
                    .unwrap();

            assert_eq!(args.config, "/etc/staff.toml");
        }
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Args::parse_from(["application", "--port", "80"]).is_err());
    }
}

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jarcat")]
#[command(version)]
#[command(about = "Extract JAR archives and catalog their manifest versions", long_about = None)]
#[command(after_help = "Examples:\n  \
  jarcat list -v app.jar                    list entries with sizes and dates\n  \
  jarcat extract app.jar -d out --skip-metadata   extract everything except META-INF\n  \
  jarcat scan /opt/app -x vendor            catalog jars, skipping */vendor\n  \
  jarcat properties app.version=1.0 app.filename=app.jar app.path=lib")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List archive entries
    List {
        /// JAR file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Detailed table with sizes, compression ratio and timestamps
        #[arg(short = 'v')]
        verbose: bool,
    },

    /// Extract an archive into a directory
    Extract {
        /// JAR file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Extract files into exdir
        #[arg(short = 'd', value_name = "DIR", default_value = ".")]
        extract_dir: String,

        /// Leave out entries under META-INF
        #[arg(long)]
        skip_metadata: bool,
    },

    /// Print the version declared in an archive's manifest
    Version {
        /// JAR file path
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Catalog the versions of every JAR under a directory
    Scan {
        /// Root directory (or a single JAR)
        #[arg(value_name = "ROOT")]
        root: String,

        /// Skip directories whose path ends with SUFFIX
        #[arg(short = 'x', value_name = "SUFFIX")]
        exclude: Vec<String>,
    },

    /// Catalog versions declared as KEY=VALUE properties
    Properties {
        /// Properties such as app.version=1.0
        #[arg(value_name = "KEY=VALUE", value_parser = parse_property)]
        properties: Vec<(String, String)>,

        #[arg(long, default_value = ".version")]
        version_suffix: String,

        #[arg(long, default_value = ".filename")]
        filename_suffix: String,

        #[arg(long, default_value = ".path")]
        path_suffix: String,

        #[arg(long, default_value = ".type")]
        type_suffix: String,
    },
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Log filter matching the quiet level.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.is_very_quiet() {
            log::LevelFilter::Error
        } else if self.is_quiet() {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        }
    }
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scan_with_exclusions() {
        let cli = Cli::parse_from(["jarcat", "-q", "scan", "/opt/app", "-x", "vendor", "-x", "tmp"]);
        assert!(cli.is_quiet());
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
        match cli.command {
            Command::Scan { root, exclude } => {
                assert_eq!(root, "/opt/app");
                assert_eq!(exclude, vec!["vendor", "tmp"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_property_pairs() {
        let cli = Cli::parse_from(["jarcat", "properties", "app.version=1.0", "app.path=a=b"]);
        match cli.command {
            Command::Properties { properties, version_suffix, .. } => {
                assert_eq!(version_suffix, ".version");
                assert_eq!(properties[0], ("app.version".to_string(), "1.0".to_string()));
                assert_eq!(properties[1], ("app.path".to_string(), "a=b".to_string()));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["jarcat", "properties", "novalue"]).is_err());
    }

    #[test]
    fn extract_defaults_to_current_dir() {
        let cli = Cli::parse_from(["jarcat", "extract", "app.jar"]);
        match cli.command {
            Command::Extract { extract_dir, skip_metadata, .. } => {
                assert_eq!(extract_dir, ".");
                assert!(!skip_metadata);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

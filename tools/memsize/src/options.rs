//! Command-line options.

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Length of the sample linked list.
    pub nodes: usize,
    /// Capacity of the sample job channel.
    pub chan_cap: u64,
    pub help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            nodes: 1000,
            chan_cap: 16,
            help: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown option `{0}`")]
    Unknown(String),
    #[error("invalid value `{value}` for `{flag}`")]
    InvalidValue { flag: &'static str, value: String },
}

/// Parse arguments (without the program name).
pub fn parse_options(args: &[String]) -> Result<Options, OptionsError> {
    let mut options = Options::default();
    for arg in args {
        if arg == "--help" || arg == "-h" {
            options.help = true;
        } else if let Some(value) = arg.strip_prefix("--nodes=") {
            options.nodes = parse_value("--nodes", value)?;
        } else if let Some(value) = arg.strip_prefix("--chan-cap=") {
            options.chan_cap = parse_value("--chan-cap", value)?;
        } else {
            return Err(OptionsError::Unknown(arg.clone()));
        }
    }
    Ok(options)
}

fn parse_value<T: std::str::FromStr>(flag: &'static str, value: &str) -> Result<T, OptionsError> {
    value.parse().map_err(|_| OptionsError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}

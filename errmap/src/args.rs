use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Demo server for status-code error mapping
#[derive(Debug, Parser)]
#[command(name = "errmap", about = "Serve demo routes with handler errors mapped to HTTP responses")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "errmap.toml", env = "ERRMAP_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "ERRMAP_LISTEN")]
    pub listen: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from(["errmap", "--config", "demo.toml", "--listen", "127.0.0.1:4000"]).unwrap();
        assert_eq!(args.config, PathBuf::from("demo.toml"));
        assert_eq!(args.listen, Some(SocketAddr::from(([127, 0, 0, 1], 4000))));
    }

    #[test]
    fn rejects_malformed_listen_address() {
        assert!(Args::try_parse_from(["errmap", "--listen", "not-an-address"]).is_err());
    }
}

//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{parse_ports, Cli},
    error::Result,
    models::{FailurePolicy, ProbeConfig},
};

/// Configuration parser that combines CLI arguments with environment variables
///
/// Precedence, lowest to highest: built-in defaults, `.env` file,
/// environment variables, explicit CLI arguments.
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<ProbeConfig> {
        self.cli.validate()?;

        // Start with default configuration
        let mut config = ProbeConfig::default();

        // Load .env file if present, then merge environment variables
        dotenv::dotenv().ok();
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config)?;

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut ProbeConfig) -> Result<()> {
        if self.cli.host != crate::defaults::DEFAULT_HOST {
            config.host = self.cli.host.clone();
        }

        if let Some(ref ports) = self.cli.ports {
            config.ports = parse_ports(ports)?;
        }

        // An explicit family flag always wins
        if self.cli.ipv4 || self.cli.ipv6 {
            config.family = self.cli.family();
        }

        if self.cli.count != crate::defaults::DEFAULT_CYCLES {
            config.cycles = self.cli.count;
        }

        if self.cli.ops != crate::defaults::DEFAULT_OPS_PER_CYCLE {
            config.ops_per_cycle = self.cli.ops;
        }

        if self.cli.timeout != crate::defaults::DEFAULT_TIMEOUT.as_millis() as u64 {
            config.timeout_ms = self.cli.timeout;
        }

        if self.cli.fail_fast {
            config.failure_policy = FailurePolicy::Abort;
        }

        config.enable_color = self.cli.use_colors();

        // These flags are CLI-only
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
        config.json = self.cli.json;

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<ProbeConfig> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &ProbeConfig) -> String {
    let ports: Vec<String> = config.ports.iter().map(|p| p.to_string()).collect();
    let mut summary = Vec::new();

    summary.push(format!("Host: {}", config.host));
    summary.push(format!("Family: {}", config.family));
    summary.push(format!("Ports: {}", ports.join(", ")));
    summary.push(format!("Cycles: {}", config.cycles));
    summary.push(format!("Ops per cycle: {}", config.ops_per_cycle));
    summary.push(format!("Timeout: {} ms", config.timeout_ms));
    summary.push(format!("Failure policy: {:?}", config.failure_policy));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IpFamily;
    use clap::Parser;

    #[test]
    fn test_defaults_without_overrides() {
        let cli = Cli::parse_from(["zpp", "localhost"]);
        let config = ConfigParser::new(cli).parse().unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.cycles, crate::defaults::DEFAULT_CYCLES);
        assert_eq!(config.ops_per_cycle, crate::defaults::DEFAULT_OPS_PER_CYCLE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_applied() {
        let cli = Cli::parse_from([
            "zpp",
            "-6",
            "-p",
            "22,443",
            "-c",
            "7",
            "-o",
            "2",
            "-t",
            "1500",
            "--fail-fast",
            "probe.example",
        ]);
        let config = ConfigParser::new(cli).parse().unwrap();

        assert_eq!(config.host, "probe.example");
        assert_eq!(config.family, IpFamily::V6);
        assert_eq!(config.ports, vec![22, 443]);
        assert_eq!(config.cycles, 7);
        assert_eq!(config.ops_per_cycle, 2);
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_invalid_cli_ports_rejected() {
        let cli = Cli::parse_from(["zpp", "-p", "1,2,3,4,5,6,7,8,9", "localhost"]);
        assert!(ConfigParser::new(cli).parse().is_err());
    }

    #[test]
    fn test_json_disables_color() {
        let cli = Cli::parse_from(["zpp", "--json", "localhost"]);
        let config = ConfigParser::new(cli).parse().unwrap();
        assert!(config.json);
        assert!(!config.enable_color);
    }

    #[test]
    fn test_config_summary_lists_fields() {
        let config = ProbeConfig::default();
        let summary = display_config_summary(&config);
        assert!(summary.contains("Host: localhost"));
        assert!(summary.contains("Ports: 80, 443"));
        assert!(summary.contains("Timeout: 4000 ms"));
    }
}

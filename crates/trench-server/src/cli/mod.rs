// crates/trench-server/src/cli/mod.rs
// CLI module for Trench commands

use clap::{Parser, Subcommand};

pub mod config;
pub mod serve;
pub mod tool;

// Re-export command handlers
pub use config::run_config_check;
pub use serve::{run_http_server, run_mcp_server};
pub use tool::run_tool;

/// Default port for the streamable HTTP transport
pub const DEFAULT_HTTP_PORT: u16 = 3400;

#[derive(Parser)]
#[command(name = "trench")]
#[command(about = "MCP tool server for a satellite ground-station simulator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (default, stdio)
    Serve {
        /// Serve streamable HTTP at /mcp instead of stdio
        #[arg(long)]
        http: bool,

        /// Port for --http
        #[arg(short, long, default_value_t = DEFAULT_HTTP_PORT, env = "TRENCH_HTTP_PORT")]
        port: u16,

        /// Bind address for --http
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Execute a tool directly
    Tool {
        /// Tool name (e.g. wait_until_time, get_next_pass)
        #[arg(index = 1)]
        name: String,

        /// JSON arguments (e.g. '{"target_sim_time": 1500}')
        #[arg(index = 2, default_value = "{}")]
        args: String,
    },

    /// Show the effective configuration and validation report
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["trench"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_http_flags() {
        let cli = Cli::try_parse_from(["trench", "serve", "--http", "--port", "9000"]).unwrap();
        match cli.command {
            Some(Commands::Serve { http, port, host }) => {
                assert!(http);
                assert_eq!(port, 9000);
                assert_eq!(host, "127.0.0.1");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_tool_args_default_to_empty_object() {
        let cli = Cli::try_parse_from(["trench", "tool", "get_simulation_state"]).unwrap();
        match cli.command {
            Some(Commands::Tool { name, args }) => {
                assert_eq!(name, "get_simulation_state");
                assert_eq!(args, "{}");
            }
            _ => panic!("expected tool"),
        }
    }
}

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(author, version, about = "Route queries to specialized LLM agents over HTTP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Compose a single answer and print it
    Chat {
        prompt: String,

        /// branching (default), sequential or parallel
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// List the registered agents
    Agents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_with_pattern() {
        let cli = Cli::parse_from(["switchyard", "chat", "black holes", "--pattern", "parallel"]);
        match cli.command {
            Commands::Chat { prompt, pattern } => {
                assert_eq!(prompt, "black holes");
                assert_eq!(pattern.as_deref(), Some("parallel"));
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_parse_serve_port() {
        let cli = Cli::parse_from(["switchyard", "serve", "-p", "8080"]);
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080) }));
    }
}

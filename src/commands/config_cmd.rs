use clap::{Args, Subcommand};

use super::recipe::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("backend: {}", config.backend.value);
                        println!("  source: {}", config.backend.source);
                        println!();

                        println!("data_path: {}", config.data_path.value.display());
                        println!("  source: {}", config.data_path.source);
                        println!();

                        let table = &config.table;
                        println!("table:");
                        println!("  driver: {}", table.driver);
                        if let Some(server) = &table.server {
                            println!("  server: {}", server);
                        }
                        println!("  database: {}", table.database.display());
                        if let Some(user) = &table.user {
                            println!("  user: {}", user);
                        }
                        if table.password.is_some() {
                            println!("  password: ********");
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

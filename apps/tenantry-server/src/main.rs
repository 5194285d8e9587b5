mod config;
mod logging;
mod server;
mod signals;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tenancy::domain::gateway::Registration;
use tenancy::TenancyModule;
use tenantry_db::Db;

use crate::config::AppConfig;

/// Tenantry Server - multi-tenant registry and authentication service
#[derive(Parser)]
#[command(name = "tenantry-server")]
#[command(about = "Tenantry Server - multi-tenant registry and authentication service")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Apply database migrations and exit
    Migrate,
    /// Create the platform tenant and its superadmin account
    BootstrapSuperadmin {
        #[arg(long, default_value = "platform")]
        subdomain: String,
        #[arg(long, default_value = "Platform")]
        company_name: String,
        #[arg(long)]
        email: String,
        /// Environment variable holding the password
        #[arg(long, default_value = "TENANTRY_SUPERADMIN_PASSWORD")]
        password_env: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose);

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    logging::init(&config.logging)?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => server::serve(config).await,
        Commands::Check => {
            println!("Configuration is valid");
            println!("{}", config.to_pretty_json()?);
            Ok(())
        }
        Commands::Migrate => {
            let db = Db::connect(&config.database).await?;
            TenancyModule::migrate(&db).await
        }
        Commands::BootstrapSuperadmin {
            subdomain,
            company_name,
            email,
            password_env,
        } => {
            let password = std::env::var(&password_env)
                .with_context(|| format!("{password_env} is not set"))?;
            let (_db, module) = server::bootstrap(&config).await?;
            let done = module
                .gateway()
                .bootstrap_superadmin(Registration {
                    company_name,
                    subdomain,
                    admin_email: email,
                    admin_password: SecretString::from(password),
                    plan_type: None,
                })
                .await
                .context("superadmin bootstrap failed")?;
            println!(
                "Superadmin {} created in tenant {} ({})",
                done.admin.email, done.tenant.subdomain, done.tenant.id
            );
            Ok(())
        }
    }
}

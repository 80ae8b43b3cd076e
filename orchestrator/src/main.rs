use anyhow::Context;
use chrono::Duration;
use clap::Parser;
use orchestrator::app_state::AppState;
use orchestrator::http::setup_http_server;
use orchestrator::init_telemetry;
use orchestrator::services::tenant::{InMemoryTenantRegistry, TenantRegistry};
use orchestrator::services::token::TokenService;
use orchestrator::settings::config::Settings;
use orchestrator_core::identity::{Identity, Role, UserId};
use orchestrator_core::tenant::TenantId;
use tracing::info;

#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Multi-tenant school administration API")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the API server (default)
    Run,
    /// List the tenants of the configured registry
    Tenants,
    /// Mint a signed credential for development and testing
    IssueToken {
        /// User id written to the `sub` claim
        #[arg(long)]
        user: String,
        /// One of admin, direction, teacher, intervenant, inspector, student_proxy
        #[arg(long, value_parser = parse_role)]
        role: Role,
        /// Tenant the credential is issued for
        #[arg(long)]
        tenant: String,
        /// Lifetime in seconds, defaults to auth.token_lifetime_secs
        #[arg(long)]
        lifetime: Option<i64>,
    },
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::from_str(value).ok_or_else(|| {
        let names: Vec<&str> = Role::all().iter().map(|role| role.as_str()).collect();
        format!("unknown role '{}', expected one of {}", value, names.join(", "))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env.local first: dotenvy never overrides variables that are already set.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Config => {
            let settings = AppState::new_for_config_only().await?;
            println!("{:#?}", &settings);
        }
        Commands::Tenants => {
            let settings = Settings::new()?;
            let registry = InMemoryTenantRegistry::load(&settings.tenants.registry_file).await?;
            for tenant in registry.list().await? {
                println!("{}\t{}\t{}", tenant.id, tenant.status.as_str(), tenant.name);
            }
        }
        Commands::IssueToken {
            user,
            role,
            tenant,
            lifetime,
        } => {
            let settings = Settings::new()?;
            let tokens = TokenService::new(&settings.auth);
            let lifetime = lifetime
                .map(Duration::seconds)
                .unwrap_or_else(|| tokens.default_lifetime());
            let identity = Identity::new(UserId::new(user), role, TenantId::new(tenant));
            println!("{}", tokens.issue(&identity, lifetime)?);
        }
        Commands::Run => {
            let settings = Settings::new()?;
            init_telemetry::init_tracing(settings.debug)?;

            let app_state = AppState::from_settings(settings).await?;
            let bind_address = app_state.settings.api.bind_address.clone();
            let handle = setup_http_server(app_state, &bind_address).await?;

            handle.await.context("HTTP server task panicked")??;
            info!("All tasks are done");
        }
    }

    Ok(())
}

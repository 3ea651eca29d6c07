use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use yatube::data::Repositories;
use yatube::infrastructure::config::AppConfig;
use yatube::infrastructure::database::{create_pool, run_migrations};
use yatube::infrastructure::logging::init_logging;
use yatube::server::{AppServices, start_http_server};

#[derive(Parser, Debug)]
#[command(name = "yatube", about = "Yatube blogging site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply migrations and serve HTTP (default).
    Serve,
    /// Apply pending migrations and exit.
    Migrate,
    /// Create a group that posts can be filed under.
    CreateGroup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a group; its posts are kept without a group.
    DeleteGroup {
        #[arg(long)]
        slug: String,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let repos = match config.database_url.as_deref() {
                Some(url) => {
                    let pool = create_pool(url)
                        .await
                        .context("failed to connect to database")?;
                    run_migrations(&pool)
                        .await
                        .context("failed to run migrations")?;
                    Repositories::postgres(pool)
                }
                None => {
                    warn!("DATABASE_URL is not set, data will be kept in memory only");
                    Repositories::in_memory()
                }
            };
            let services = AppServices::from_config(&config, repos);
            start_http_server(&config, services).await
        }
        Command::Migrate => {
            let pool = connect(&config).await?;
            run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            Ok(())
        }
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            let repos = Repositories::postgres(connect(&config).await?);
            let services = AppServices::from_config(&config, repos);
            let group = services
                .groups
                .create_group(&title, &slug, &description)
                .await?;
            info!(group_id = %group.id, slug = %group.slug, "group created");
            Ok(())
        }
        Command::DeleteGroup { slug } => {
            let repos = Repositories::postgres(connect(&config).await?);
            let services = AppServices::from_config(&config, repos);
            services.groups.delete_group(&slug).await?;
            info!(slug = %slug, "group deleted");
            Ok(())
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for this command")?;
    create_pool(url)
        .await
        .context("failed to connect to database")
}

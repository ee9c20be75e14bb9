//! Migrate command - apply or revert a service's schema

use anyhow::{bail, Context};
use clap::Args;
use sqlx::PgPool;
use tracing::info;

use crate::config::ServiceKind;
use crate::infrastructure::storage::{
    connect_pool, ping, run_service_migrations, service_migrations, PostgresMigrator,
};

use super::server::{init_observability, load_config};

#[derive(Args)]
pub struct MigrateArgs {
    /// Service whose tables are migrated
    #[arg(value_enum)]
    pub service: ServiceKind,

    /// Revert the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    init_observability(&config, args.service);

    let Some(postgres) = config.database.postgres_config() else {
        bail!("a database URL is required to run migrations (set DATABASE_URL)");
    };

    let pool = connect_pool(&postgres).await?;
    ping(&pool).await?;

    if args.revert {
        revert_latest(&pool, args.service).await
    } else {
        let applied = run_service_migrations(&pool, args.service).await?;
        info!(service = %args.service, applied, "Migrations applied");
        Ok(())
    }
}

async fn revert_latest(pool: &PgPool, kind: ServiceKind) -> anyhow::Result<()> {
    let migrator = PostgresMigrator::new(pool.clone(), kind.name());

    let Some(version) = migrator.current_version().await? else {
        info!(service = %kind, "No applied migrations to revert");
        return Ok(());
    };

    let migration = service_migrations(kind)
        .into_iter()
        .find(|m| m.version == version)
        .with_context(|| format!("migration {} is not known to {}", version, kind))?;

    migrator.revert_migration(&migration).await?;
    info!(service = %kind, version, "Migration reverted");

    Ok(())
}

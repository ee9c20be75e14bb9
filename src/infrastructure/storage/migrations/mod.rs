//! Database schema migrations
//!
//! Each service owns a fixed, ordered list of idempotent migrations. Applied
//! versions are tracked per service in a `_migrations` table, so services may
//! share one database.

use sqlx::postgres::PgPool;

use crate::config::ServiceKind;
use crate::domain::DomainError;

/// Applies and reverts migrations against a PostgreSQL pool
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
    scope: String,
}

impl PostgresMigrator {
    /// `scope` names the owner of the migrations, e.g. the service name
    pub fn new(pool: PgPool, scope: impl Into<String>) -> Self {
        Self {
            pool,
            scope: scope.into(),
        }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                scope TEXT NOT NULL,
                version BIGINT NOT NULL,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (scope, version)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM _migrations WHERE scope = $1 AND version = $2)",
        )
        .bind(&self.scope)
        .bind(version)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Runs a single migration; returns false when it was already applied
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(false);
        }

        // Migration bodies may hold several statements
        sqlx::raw_sql(&migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (scope, version, description) VALUES ($1, $2, $3)")
            .bind(&self.scope)
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tracing::info!(
            scope = %self.scope,
            version = migration.version,
            description = %migration.description,
            "Applied migration"
        );

        Ok(true)
    }

    /// Reverts a single migration; returns false when it was not applied
    pub async fn revert_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(false);
        }

        sqlx::raw_sql(&migration.down)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE scope = $1 AND version = $2")
            .bind(&self.scope)
            .bind(migration.version)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        tracing::info!(scope = %self.scope, version = migration.version, "Reverted migration");

        Ok(true)
    }

    /// Returns the latest version applied in this scope
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations WHERE scope = $1")
            .bind(&self.scope)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// Migrations owned by a service, in ascending version order
pub fn service_migrations(kind: ServiceKind) -> Vec<Migration> {
    match kind {
        ServiceKind::Auth => vec![Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                email VARCHAR(254) NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_email_key UNIQUE (email)
            );
            "#,
            "DROP TABLE IF EXISTS users;",
        )],
        ServiceKind::Orders => vec![Migration::new(
            1,
            "Create orders table",
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL,
                product VARCHAR(255) NOT NULL,
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                total_price DOUBLE PRECISION NOT NULL CHECK (total_price >= 0),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders(user_id);
            "#,
            "DROP TABLE IF EXISTS orders;",
        )],
        ServiceKind::Products => vec![Migration::new(
            1,
            "Create products table",
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                description TEXT,
                price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
                stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
            "DROP TABLE IF EXISTS products;",
        )],
    }
}

/// Runs all pending migrations of a service, returning how many were applied
pub async fn run_service_migrations(pool: &PgPool, kind: ServiceKind) -> Result<usize, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone(), kind.name());
    let mut applied = 0;

    for migration in service_migrations(kind) {
        if migrator.run_migration(&migration).await? {
            applied += 1;
        }
    }

    Ok(applied)
}

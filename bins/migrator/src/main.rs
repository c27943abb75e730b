//! Migration runner.

use cofre_db::migration::Migrator;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("COFRE__DATABASE__URL"))
        .map_err(|_| anyhow::anyhow!("DATABASE_URL or COFRE__DATABASE__URL must be set"))?;

    let db = cofre_db::connect(&database_url).await?;
    Migrator::up(&db, None).await?;

    println!("Migrations applied");
    Ok(())
}

use crate::config::config;
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let pool = DatabaseManager::connect_lazy(&config().database)?;
    DatabaseManager::migrate(&pool).await?;
    println!("Migrations applied");
    Ok(())
}

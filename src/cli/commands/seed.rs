use crate::auth;
use crate::config::config;
use crate::database::{seed, DatabaseManager};

pub async fn handle() -> anyhow::Result<()> {
    let config = config();
    let bcrypt_cost = auth::check_bcrypt_cost(config.security.bcrypt_cost)?;
    let pool = DatabaseManager::connect_lazy(&config.database)?;
    let today = chrono::Local::now().date_naive();

    seed::seed_sample_data(&pool, bcrypt_cost, today).await?;
    println!("Sample data in place");
    Ok(())
}

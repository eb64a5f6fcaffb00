//! Account command handlers

use crate::config::Config;
use crate::db::Store;
use crate::services::{AccountService, SeaOrmAccountService};

async fn account_service(config: &Config) -> anyhow::Result<(Store, SeaOrmAccountService)> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmAccountService::new(store.clone(), config.security.clone());
    Ok((store, service))
}

pub async fn cmd_register(config: &Config, email: &str, password: &str) -> anyhow::Result<()> {
    let (_, service) = account_service(config).await?;

    let user = service.register(email, password, password).await?;

    println!("✓ Account created");
    println!("  ID: {} | Username: {}", user.id, user.username);
    println!("  Email: {}", user.email);

    Ok(())
}

pub async fn cmd_deactivate(config: &Config, email: &str) -> anyhow::Result<()> {
    let (store, service) = account_service(config).await?;

    let Some(user) = store.get_user_by_email(email.trim()).await? else {
        println!("No account uses {email}");
        return Ok(());
    };

    if !user.is_active {
        println!("Account {} is already inactive", user.username);
        return Ok(());
    }

    service.deactivate(user.id).await?;
    println!("✓ Account {} deactivated", user.username);

    Ok(())
}

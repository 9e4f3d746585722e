//! Start-up provisioning of the administrator account

use anyhow::Result;
use tracing::{info, warn};

use crate::{
    config::AdminBootstrap,
    credentials::CredentialService,
    models::{NewAccount, Role},
    repositories::AccountStore,
    validation::{normalize_email, validate_email, validate_password},
};

/// Create the configured administrator unless an account with that email exists
///
/// An existing account is left untouched, whatever its role.
pub async fn ensure_admin<A: AccountStore>(
    accounts: &A,
    credentials: &CredentialService,
    admin: &AdminBootstrap,
) -> Result<()> {
    let email = normalize_email(&admin.email);
    validate_email(&email).map_err(|e| anyhow::anyhow!("Invalid ADMIN_EMAIL: {}", e))?;
    validate_password(&admin.password)
        .map_err(|e| anyhow::anyhow!("Invalid ADMIN_PASSWORD: {}", e))?;

    if let Some(existing) = accounts.find_account_by_email(&email).await? {
        if !existing.is_admin() {
            warn!(
                "Bootstrap email {} belongs to a non-admin account; leaving it unchanged",
                email
            );
        }
        return Ok(());
    }

    let password_hash = credentials.hash_blocking(admin.password.clone()).await?;
    let created = accounts
        .create_account(&NewAccount {
            email: email.clone(),
            name: admin.name.clone(),
            phone: None,
            password_hash,
            role: Role::Admin,
        })
        .await;

    match created {
        Ok(account) => info!("Created administrator account {}", account.id),
        // Another service instance created it between the lookup and the insert
        Err(e) if e.is_unique_violation() => {
            info!("Administrator {} was created concurrently", email)
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

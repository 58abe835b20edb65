//! The single shared admin password, stored as a bcrypt hash in the
//! key/value config table and seeded at process start when absent.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::db;
use crate::error::{AppError, AppResult};
use crate::state::DbPool;

pub const ADMIN_PASSWORD_KEY: &str = "admin_password";

/// Seed the admin password from configuration if no hash is stored yet.
/// An existing hash is never overwritten here.
pub fn init_admin_password(pool: &DbPool, initial: &str) -> AppResult<()> {
    if db::config::get(pool, ADMIN_PASSWORD_KEY)?.is_none() {
        let hashed = hash(initial, DEFAULT_COST)?;
        db::config::set(pool, ADMIN_PASSWORD_KEY, &hashed)?;
        tracing::info!("Initialized admin password from configuration");
    }
    Ok(())
}

/// Check a candidate password against the stored hash. A missing config row
/// is a server error, not an authentication failure.
pub fn verify_admin_password(pool: &DbPool, candidate: &str) -> AppResult<bool> {
    let stored = db::config::get(pool, ADMIN_PASSWORD_KEY)?
        .ok_or_else(|| AppError::Internal("Admin password is not configured".into()))?;
    Ok(verify(candidate, &stored)?)
}

pub fn set_admin_password(pool: &DbPool, new_password: &str) -> AppResult<()> {
    let hashed = hash(new_password, DEFAULT_COST)?;
    db::config::set(pool, ADMIN_PASSWORD_KEY, &hashed)?;
    Ok(())
}

//! Startup database probe
//!
//! The only database interaction is a one-shot `SELECT NOW()` used to prove
//! the configured connection string works.

use chrono::{DateTime, Utc};
use tokio_postgres::NoTls;

use crate::error::{ParleyError, Result};

/// Connect to `url`, run `SELECT NOW()` and return the server clock
///
/// # Errors
///
/// Returns `ParleyError::Database` if the connection or query fails
pub async fn probe(url: &str) -> Result<DateTime<Utc>> {
    let (client, connection) = tokio_postgres::connect(url, NoTls)
        .await
        .map_err(|e| ParleyError::Database(format!("Failed to connect: {}", e)))?;

    tokio::spawn(async move {
        if let Err(error) = connection.await {
            tracing::error!(reason = %error, "Database connection error");
        }
    });

    let row = client
        .query_one("SELECT NOW()", &[])
        .await
        .map_err(|e| ParleyError::Database(format!("Probe query failed: {}", e)))?;

    let now: DateTime<Utc> = row
        .try_get(0)
        .map_err(|e| ParleyError::Database(format!("Unexpected probe result: {}", e)))?;

    tracing::info!(server_time = %now, "Database probe succeeded");
    Ok(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_rejects_malformed_url() {
        let err = probe("not a connection string").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParleyError>(),
            Some(ParleyError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_unreachable_server() {
        let err = probe("postgres://user:pw@127.0.0.1:9/db").await.unwrap_err();
        assert!(err.to_string().contains("Failed to connect"));
    }
}

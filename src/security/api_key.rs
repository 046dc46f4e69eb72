//! API key lookup and permission checks.

use std::collections::HashMap;

use crate::config::ApiKeyConfig;
use crate::error::{ErrorKind, GatewayError};

const ACTIVE: &str = "active";

/// A caller that passed the key check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub name: String,
}

#[derive(Debug, Clone)]
struct KeyEntry {
    client_name: String,
    active: bool,
    permissions: Vec<String>,
}

/// In-memory key store.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyRepository {
    keys: HashMap<String, KeyEntry>,
}

impl ApiKeyRepository {
    pub fn new(keys: Vec<ApiKeyConfig>) -> Self {
        let keys = keys
            .into_iter()
            .map(|k| {
                let entry = KeyEntry {
                    client_name: k.client_name,
                    active: k.status.eq_ignore_ascii_case(ACTIVE),
                    permissions: k.permissions,
                };
                (k.key, entry)
            })
            .collect();
        Self { keys }
    }

    /// Accepts `key` for `METHOD:PATH`, or fails with Unauthorized.
    pub fn authorize(&self, key: Option<&str>, method: &str, path: &str) -> Result<Client, GatewayError> {
        let key = key.map(str::trim).filter(|k| !k.is_empty()).ok_or_else(|| {
            tracing::debug!("Missing Api-Key");
            GatewayError::new(ErrorKind::Unauthorized)
        })?;

        let Some(entry) = self.keys.get(key) else {
            tracing::info!(method, path, "Unknown API key");
            return Err(ErrorKind::Unauthorized.into());
        };

        if !entry.active {
            tracing::info!(client = %entry.client_name, "Inactive API key");
            return Err(ErrorKind::Unauthorized.into());
        }

        let wanted = format!("{}:{}", method.to_ascii_uppercase(), path);
        let granted = entry.permissions.iter().any(|p| p == "*" || p.eq_ignore_ascii_case(&wanted));
        if !granted {
            tracing::info!(client = %entry.client_name, permission = %wanted, "API key lacks permission");
            return Err(ErrorKind::Unauthorized.into());
        }

        Ok(Client { name: entry.client_name.clone() })
    }
}

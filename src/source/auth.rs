//! Authentication for the Azure DevOps REST API.
//!
//! Two methods, mirroring what a single operator realistically has on hand:
//! a Personal Access Token (sent as Basic auth with an empty username), or a
//! bearer token minted by an already-logged-in Azure CLI.

use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::process::Command;

/// Azure DevOps resource ID used when requesting a token from the Azure CLI.
const ADO_RESOURCE_ID: &str = "499b84ac-1321-427f-aa17-267ca6975798";

/// How requests to ADO are authenticated.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Personal Access Token, sent as `Basic` with an empty username.
    Pat(String),
    /// Bearer token fetched from `az account get-access-token` per request.
    /// Tokens are short-lived and a batch can run for a long time, so the
    /// CLI is consulted each time rather than once at startup.
    AzureCli,
}

impl AuthMethod {
    /// Choose PAT auth when a token was configured, Azure CLI otherwise.
    pub fn from_pat(pat: Option<String>) -> Self {
        match pat {
            Some(token) if !token.is_empty() => AuthMethod::Pat(token),
            _ => AuthMethod::AzureCli,
        }
    }

    /// Produce the `Authorization` header value for one request.
    pub fn header(&self) -> Result<String> {
        match self {
            AuthMethod::Pat(token) => {
                let encoded = STANDARD.encode(format!(":{}", token));
                Ok(format!("Basic {}", encoded))
            }
            AuthMethod::AzureCli => {
                let token = azure_cli_token()?;
                Ok(format!("Bearer {}", token))
            }
        }
    }
}

/// Obtain an ADO access token via the Azure CLI.
fn azure_cli_token() -> Result<String> {
    let output = Command::new("az")
        .args([
            "account",
            "get-access-token",
            "--resource",
            ADO_RESOURCE_ID,
            "--query",
            "accessToken",
            "-o",
            "tsv",
        ])
        .output()
        .map_err(|e| {
            Error::SourceUnavailable(format!(
                "Azure CLI not found ({}). Install it or set ADO_PAT.",
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::SourceUnavailable(format!(
            "Azure CLI token fetch failed, run `az login` first: {}",
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::SourceUnavailable(
            "Azure CLI returned an empty access token".to_string(),
        ));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pat_prefers_token() {
        assert!(matches!(
            AuthMethod::from_pat(Some("secret".to_string())),
            AuthMethod::Pat(_)
        ));
    }

    #[test]
    fn test_from_pat_empty_falls_back_to_cli() {
        assert!(matches!(
            AuthMethod::from_pat(Some(String::new())),
            AuthMethod::AzureCli
        ));
        assert!(matches!(AuthMethod::from_pat(None), AuthMethod::AzureCli));
    }

    #[test]
    fn test_pat_header_is_basic_with_empty_username() {
        let auth = AuthMethod::Pat("token123".to_string());
        let header = auth.header().unwrap();
        let expected = STANDARD.encode(":token123");
        assert_eq!(header, format!("Basic {}", expected));
    }
}

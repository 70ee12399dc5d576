//! Publish target registry — the WordPress sites this deployment may post to.
//!
//! Sites are configuration, not job state: they are loaded once at startup from
//! a JSON file and referenced by id when a bulk import is triggered.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A WordPress-compatible publish target.
///
/// `app_password` is a WordPress application password paired with `username`
/// for Basic auth against the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishSite {
    pub id: String,
    pub name: String,
    /// Site root, e.g. `https://blog.example.com` (no trailing slash needed).
    pub base_url: String,
    pub username: String,
    pub app_password: String,
}

/// Credential-free view of a site, safe to return over the API.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub id: String,
    pub name: String,
    pub base_url: String,
}

impl From<&PublishSite> for SiteSummary {
    fn from(site: &PublishSite) -> Self {
        Self {
            id: site.id.clone(),
            name: site.name.clone(),
            base_url: site.base_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: HashMap<String, PublishSite>,
}

impl SiteRegistry {
    /// Loads the registry from a JSON array of site objects.
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sites file '{path}'"))?;
        let sites: Vec<PublishSite> = serde_json::from_str(&raw)
            .with_context(|| format!("Sites file '{path}' is not a valid site list"))?;
        Ok(Self::from_sites(sites))
    }

    pub fn from_sites(sites: Vec<PublishSite>) -> Self {
        Self {
            sites: sites.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&PublishSite> {
        self.sites.get(id)
    }

    pub fn summaries(&self) -> Vec<SiteSummary> {
        let mut list: Vec<SiteSummary> = self.sites.values().map(SiteSummary::from).collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: &str) -> PublishSite {
        PublishSite {
            id: id.to_string(),
            name: format!("Site {id}"),
            base_url: format!("https://{id}.example.com"),
            username: "admin".to_string(),
            app_password: "xxxx yyyy zzzz".to_string(),
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let registry = SiteRegistry::from_sites(vec![site("a"), site("b")]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_summaries_redact_credentials() {
        let registry = SiteRegistry::from_sites(vec![site("b"), site("a")]);
        let summaries = registry.summaries();
        assert_eq!(summaries[0].id, "a");
        let json = serde_json::to_value(&summaries).unwrap();
        assert!(json[0].get("app_password").is_none());
        assert!(json[0].get("username").is_none());
    }
}

//! Display icon URLs for currencies, countries and cash machines.

use crate::core::config::SiteConfig;

pub trait IconResolver: Send + Sync {
    /// Absolute URL of a stored icon, `None` when the entity has no icon.
    fn icon_url(&self, path: Option<&str>) -> Option<String>;
}

/// Builds icon URLs as `{protocol}{domain}/media/{path}`.
#[derive(Debug, Clone)]
pub struct SiteIconResolver {
    base: String,
}

impl SiteIconResolver {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            base: format!(
                "{}{}",
                site.protocol,
                site.domain.trim_end_matches('/')
            ),
        }
    }
}

impl IconResolver for SiteIconResolver {
    fn icon_url(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/media/{}", self.base, p.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_url() {
        let resolver = SiteIconResolver::new(&SiteConfig {
            protocol: "https://".to_string(),
            domain: "example.com/".to_string(),
        });

        assert_eq!(
            resolver.icon_url(Some("icons/valute/usd.svg")),
            Some("https://example.com/media/icons/valute/usd.svg".to_string())
        );
        assert_eq!(resolver.icon_url(Some("")), None);
        assert_eq!(resolver.icon_url(None), None);
    }
}

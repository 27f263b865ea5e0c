use std::collections::BTreeMap;

use crate::config::{env_or, parse_value, ConfigError};

pub const DEFAULT_TRANSACTIONS_API_URL: &str =
    "https://server.sahulatpay.com/transactions/tele/last-15-mins";
pub const DEFAULT_MERCHANTS: &str = "51:Monetix,5,16";

/// A merchant with its own scoped query endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merchant {
    pub id: u32,
    /// Optional friendly name, e.g. "Monetix"
    pub name: Option<String>,
    pub endpoint: String,
}

impl Merchant {
    /// Name used in report labels
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Merchant {}", self.id),
        }
    }
}

/// Fixed set of merchants and the global endpoint, built once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantRegistry {
    global_endpoint: String,
    merchants: BTreeMap<u32, Merchant>,
}

impl MerchantRegistry {
    /// Create an empty registry over a global endpoint
    pub fn new(global_endpoint: impl Into<String>) -> Self {
        Self {
            global_endpoint: global_endpoint.into(),
            merchants: BTreeMap::new(),
        }
    }

    /// Add a merchant; its endpoint is the global one scoped by `merchantId`
    pub fn with_merchant(mut self, id: u32, name: Option<&str>) -> Self {
        let separator = if self.global_endpoint.contains('?') { '&' } else { '?' };
        let endpoint = format!("{}{}merchantId={}", self.global_endpoint, separator, id);
        self.merchants.insert(
            id,
            Merchant {
                id,
                name: name.map(str::to_string),
                endpoint,
            },
        );
        self
    }

    /// Parse a merchant list such as `51:Monetix,5,16`
    pub fn parse(global_endpoint: &str, list: &str) -> Result<Self, ConfigError> {
        let mut registry = Self::new(global_endpoint);

        for entry in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (id, name) = match entry.split_once(':') {
                Some((id, name)) => {
                    let name = name.trim();
                    (id.trim(), (!name.is_empty()).then_some(name))
                }
                None => (entry, None),
            };
            let id: u32 = parse_value("MERCHANTS", id)?;
            registry = registry.with_merchant(id, name);
        }

        Ok(registry)
    }

    /// Build from `TRANSACTIONS_API_URL` and `MERCHANTS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = env_or("TRANSACTIONS_API_URL", DEFAULT_TRANSACTIONS_API_URL);
        let merchants = env_or("MERCHANTS", DEFAULT_MERCHANTS);
        Self::parse(&base, &merchants)
    }

    pub fn global_endpoint(&self) -> &str {
        &self.global_endpoint
    }

    /// Look up a merchant from command text; only the canonical decimal form matches
    pub fn lookup(&self, raw_id: &str) -> Option<&Merchant> {
        let id: u32 = raw_id.parse().ok()?;
        if id.to_string() != raw_id {
            return None;
        }
        self.merchants.get(&id)
    }

    /// Merchants in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Merchant> {
        self.merchants.values()
    }

    pub fn len(&self) -> usize {
        self.merchants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merchants.is_empty()
    }

    /// Comma-separated list of configured ids
    pub fn available_ids(&self) -> String {
        self.merchants
            .keys()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.example.com/transactions/last-15-mins";

    #[test]
    fn test_parse_default_list() {
        let registry = MerchantRegistry::parse(BASE, DEFAULT_MERCHANTS).unwrap();
        assert_eq!(registry.len(), 3);

        let ids: Vec<u32> = registry.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![5, 16, 51]);
        assert_eq!(registry.available_ids(), "5, 16, 51");

        let monetix = registry.lookup("51").unwrap();
        assert_eq!(monetix.display_name(), "Monetix");
        assert_eq!(monetix.endpoint, format!("{}?merchantId=51", BASE));

        assert_eq!(registry.lookup("5").unwrap().display_name(), "Merchant 5");
    }

    #[test]
    fn test_lookup_is_canonical() {
        let registry = MerchantRegistry::parse(BASE, "51:Monetix").unwrap();
        assert!(registry.lookup("51").is_some());
        assert!(registry.lookup("051").is_none());
        assert!(registry.lookup("+51").is_none());
        assert!(registry.lookup(" 51").is_none());
        assert!(registry.lookup("").is_none());
        assert!(registry.lookup("999").is_none());
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_blank_names() {
        let registry = MerchantRegistry::parse(BASE, " 7 : , 8:Acme ,, ").unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("7").unwrap().name, None);
        assert_eq!(registry.lookup("8").unwrap().display_name(), "Acme");
    }

    #[test]
    fn test_parse_rejects_bad_id() {
        let err = MerchantRegistry::parse(BASE, "51,abc").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MERCHANTS", .. }));
    }

    #[test]
    fn test_endpoint_keeps_existing_query() {
        let registry = MerchantRegistry::parse(&format!("{}?window=15", BASE), "5").unwrap();
        assert_eq!(
            registry.lookup("5").unwrap().endpoint,
            format!("{}?window=15&merchantId=5", BASE)
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = MerchantRegistry::parse(BASE, "").unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.available_ids(), "");
        assert_eq!(registry.global_endpoint(), BASE);
    }
}

use std::fmt;

use super::model::TransactionRecord;

/// Payment providers tracked as separate scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Easypaisa,
    JazzCash,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Easypaisa, Provider::JazzCash];

    /// Label as it appears in `providerDetails.name`
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Easypaisa => "Easypaisa",
            Provider::JazzCash => "JazzCash",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Records whose provider name exactly equals the provider's label
pub fn filter_by_provider(
    records: &[TransactionRecord],
    provider: Provider,
) -> Vec<&TransactionRecord> {
    records
        .iter()
        .filter(|r| r.provider_name() == Some(provider.label()))
        .collect()
}

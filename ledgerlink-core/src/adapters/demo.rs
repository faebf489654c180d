//! Demo feed provider for trying the pipeline without a real feed
//!
//! Generates a small fixed batch of transactions over the last week,
//! including provisional card transactions, against two demo accounts.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::{AccountMap, SourceTransaction};
use crate::ports::{FeedProvider, FetchOutcome};

pub const DEMO_CHECKING: &str = "demo-checking-001";
pub const DEMO_CREDIT: &str = "demo-credit-001";

/// Account mappings matching the demo feed
pub fn demo_account_map() -> AccountMap {
    let mut map = AccountMap::new();
    map.insert(DEMO_CHECKING, "Checking");
    map.insert(DEMO_CREDIT, "Sapphire Reserve");
    map
}

/// Demo feed provider with a deterministic transaction batch
pub struct DemoFeedProvider;

impl DemoFeedProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemoFeedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedProvider for DemoFeedProvider {
    fn name(&self) -> &str {
        "demo"
    }

    fn fetch(&self) -> Result<FetchOutcome> {
        let today = Utc::now().date_naive();

        let transactions = vec![
            SourceTransaction::settled(
                "demo-tx-1001",
                DEMO_CHECKING,
                today - Duration::days(6),
                Decimal::new(425000, 2),
            )
            .with_merchant("Acme Corp")
            .with_description("ACME CORP PAYROLL DIRECT DEPOSIT"),
            SourceTransaction::settled(
                "demo-tx-1002",
                DEMO_CHECKING,
                today - Duration::days(5),
                Decimal::new(-156742, 2),
            )
            .with_merchant("Oak Street Apartments")
            .with_description("RENT PAYMENT"),
            SourceTransaction::settled(
                "demo-tx-1003",
                DEMO_CREDIT,
                today - Duration::days(4),
                Decimal::new(-8734, 2),
            )
            .with_merchant("Whole Foods Market")
            .with_description("WHOLEFDS #10372"),
            SourceTransaction::settled(
                "demo-tx-1004",
                DEMO_CREDIT,
                today - Duration::days(2),
                Decimal::new(-1549, 2),
            )
            .with_merchant("Netflix")
            .with_description("NETFLIX.COM"),
            // Recent card purchases the feed still reports as provisional
            SourceTransaction::provisional(DEMO_CREDIT, today - Duration::days(1), Decimal::new(-625, 2))
                .with_merchant("Starbucks")
                .with_description("STARBUCKS STORE 0552"),
            SourceTransaction::provisional(DEMO_CREDIT, today, Decimal::new(-4215, 2))
                .with_merchant("Shell Oil")
                .with_description("SHELL OIL 5744"),
        ];

        Ok(FetchOutcome {
            transactions,
            warnings: Vec::new(),
        })
    }
}

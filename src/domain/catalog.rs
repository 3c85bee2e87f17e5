//! The four fixed datasets shown on the dashboard.

use super::DatasetSpec;

pub const TRADE_BALANCE: DatasetSpec = DatasetSpec {
    key: "trade",
    title: "Trade Balance Components (Seasonally Adjusted, $B)",
    y_title: "Value (Billion USD)",
    series: &[
        ("Imports excl. ships/aircraft/diamonds", 77),
        ("Exports excl. ships/aircraft/diamonds", 624440),
        ("Trade Deficit excl. ships/aircraft/diamonds", 624477),
        ("Trade Deficit excl. ships/aircraft/diamonds & energy", 624478),
    ],
};

pub const IMPORTS_BY_USE: DatasetSpec = DatasetSpec {
    key: "imports",
    title: "Imports by Economic Use (Seasonally Adjusted, $B)",
    y_title: "Imports (Billion USD)",
    series: &[
        ("Raw Materials (excl. diamonds & fuel)", 51315),
        ("Investment Goods (excl. ships & aircraft)", 51298),
        ("Consumer Goods", 51317),
    ],
};

pub const EXPORTS_BY_TECH: DatasetSpec = DatasetSpec {
    key: "tech",
    title: "Exports by Technology Level (Seasonally Adjusted, $B)",
    y_title: "Exports (Billion USD)",
    series: &[
        ("High-tech", 624416),
        ("Low-tech", 624417),
        ("Medium-high tech", 624418),
        ("Medium-low tech", 624419),
    ],
};

pub const EXPORTS_BY_REGION: DatasetSpec = DatasetSpec {
    key: "region",
    title: "Exports by Region – USA, EU, Asia (Seasonally Adjusted, $B)",
    y_title: "Exports (Billion USD)",
    series: &[("USA (SA)", 11207), ("EU (SA)", 11211), ("Asia (SA)", 11209)],
};

/// Dashboard order.
pub const ALL: [DatasetSpec; 4] = [TRADE_BALANCE, IMPORTS_BY_USE, EXPORTS_BY_TECH, EXPORTS_BY_REGION];

pub fn find(key: &str) -> Option<DatasetSpec> {
    ALL.iter().copied().find(|spec| spec.key.eq_ignore_ascii_case(key))
}

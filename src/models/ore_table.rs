use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded reference dataset describing ore composition per rock type
const ROCK_TYPES_JSON: &str = include_str!("../../data/rock_types.json");

/// Game regions the reference dataset covers
pub const GAME_REGIONS: &[&str] = &["STANTON", "PYRO"];

/// Ore value tier, ordered by display precedence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OreTier {
    Highest,
    High,
    Medium,
    Low,
    Other,
}

impl OreTier {
    /// Sort key: HIGHEST < HIGH < MEDIUM < LOW < OTHER
    pub fn precedence(self) -> usize {
        match self {
            OreTier::Highest => 0,
            OreTier::High => 1,
            OreTier::Medium => 2,
            OreTier::Low => 3,
            OreTier::Other => 4,
        }
    }
}

/// One display row of a deposit's ore table
///
/// Percentage fields are preformatted as whole-percent strings ("42%")
/// since the table is read-only display data.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OreRow {
    pub name: String,
    pub prob: String,
    pub min: String,
    pub max: String,
    pub med: String,
    pub tier: OreTier,
    pub color: String,
}

/// Raw per-ore fields as they appear in the reference dataset
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawOre {
    prob: f64,
    #[serde(rename = "minPct")]
    min_pct: f64,
    #[serde(rename = "maxPct")]
    max_pct: f64,
    #[serde(rename = "medPct")]
    med_pct: f64,
}

/// Look up an ore's value tier and display color by uppercased name
fn ore_value(name_upper: &str) -> (OreTier, &'static str) {
    const HIGHEST: &[&str] = &["QUANTANIUM", "STILERON", "RICCITE"];
    const HIGH: &[&str] = &["TARANITE", "BEXALITE", "GOLD"];
    const MEDIUM: &[&str] = &["LARANITE", "BORASE", "BERYL", "AGRICIUM", "HEPHAESTANITE"];
    const LOW: &[&str] = &[
        "TUNGSTEN", "TITANIUM", "SILICON", "IRON", "QUARTZ", "CORUNDUM", "COPPER", "TIN",
        "ALUMINUM", "ICE",
    ];

    if HIGHEST.contains(&name_upper) {
        (OreTier::Highest, "#E88AFF")
    } else if HIGH.contains(&name_upper) {
        (OreTier::High, "#63E64C")
    } else if MEDIUM.contains(&name_upper) {
        (OreTier::Medium, "#E6E14C")
    } else if LOW.contains(&name_upper) {
        (OreTier::Low, "#E69E4C")
    } else {
        (OreTier::Other, "#888")
    }
}

fn format_pct(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-region, per-deposit-type ore tables
///
/// Built once at startup from the embedded reference dataset and treated
/// as immutable afterwards.
#[derive(Debug, Clone)]
pub struct DepositTables {
    regions: HashMap<String, HashMap<String, Vec<OreRow>>>,
}

impl DepositTables {
    /// Build the tables from the embedded reference dataset
    ///
    /// A malformed dataset is a startup-fatal error: every resolution
    /// display depends on these tables.
    pub fn load() -> Result<Self, String> {
        Self::from_json(ROCK_TYPES_JSON)
    }

    /// Build the tables from a JSON document
    pub fn from_json(json: &str) -> Result<Self, String> {
        let root: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse rock type dataset: {}", e))?;

        let mut regions = HashMap::new();
        for &region in GAME_REGIONS {
            let tables = match root.get(region).and_then(|v| v.as_object()) {
                Some(region_data) => Self::build_region(region, region_data)?,
                // A region absent from the dataset gets an empty table set
                None => HashMap::new(),
            };
            regions.insert(region.to_string(), tables);
        }

        Ok(Self { regions })
    }

    fn build_region(
        region: &str,
        region_data: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<HashMap<String, Vec<OreRow>>, String> {
        let mut tables = HashMap::new();

        for (deposit_name, details) in region_data {
            let mut table = Vec::new();

            if let Some(ores) = details.get("ores").and_then(|v| v.as_object()) {
                for (ore_name, fields) in ores {
                    let ore: RawOre = serde_json::from_value(fields.clone()).map_err(|e| {
                        format!(
                            "Invalid ore entry '{}' in {}/{}: {}",
                            ore_name, region, deposit_name, e
                        )
                    })?;

                    let (tier, color) = ore_value(&ore_name.to_uppercase());
                    table.push(OreRow {
                        name: title_case(ore_name),
                        prob: format_pct(ore.prob),
                        min: format_pct(ore.min_pct),
                        max: format_pct(ore.max_pct),
                        med: format_pct(ore.med_pct),
                        tier,
                        color: color.to_string(),
                    });
                }
            }

            // Stable sort: equal-tier rows keep their reference-data order
            table.sort_by_key(|row| row.tier.precedence());
            tables.insert(deposit_name.to_uppercase(), table);
        }

        Ok(tables)
    }

    /// Ore table for a deposit type, looked up case-insensitively
    pub fn ore_table(&self, region: &str, deposit_type: &str) -> Option<&[OreRow]> {
        self.regions
            .get(&region.to_uppercase())
            .and_then(|tables| tables.get(&deposit_type.to_uppercase()))
            .map(|rows| rows.as_slice())
    }

    /// Deposit type names known for a region (uppercased)
    pub fn deposit_types(&self, region: &str) -> Vec<&str> {
        self.regions
            .get(&region.to_uppercase())
            .map(|tables| tables.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default()
    }
}

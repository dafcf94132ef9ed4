use crate::models::multiplier::MULTIPLIER_CODES;
use crate::models::scan::DepositResolution;
use regex::Regex;
use std::sync::OnceLock;

fn trailing_digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)$").expect("hard-coded pattern"))
}

/// Resolve a normalized code against the multiplier table
///
/// The trailing digit run of the code is taken as the numeric deposit
/// code; any prefix only matters for display upstream. The first table
/// entry whose base code divides it evenly wins, and the quotient is the
/// deposit count. An unresolved code is a normal outcome, not an error.
pub fn lookup_deposit(code: Option<&str>) -> Option<DepositResolution> {
    let code = code?;
    let caps = trailing_digits_regex().captures(code)?;
    let num_code: u64 = caps[1].parse().ok()?;
    if num_code == 0 {
        // Zero divides everything; a zero code carries no deposits
        return None;
    }

    for entry in MULTIPLIER_CODES {
        if num_code % entry.base_code == 0 {
            return Some(DepositResolution {
                name: entry.display_name.to_string(),
                key: entry.key.to_string(),
                rarity: entry.rarity.to_string(),
                base_code: entry.base_code,
                deposits: num_code / entry.base_code,
                category: entry.category.to_string(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_code() {
        assert_eq!(lookup_deposit(None), None);
    }

    #[test]
    fn test_code_without_digits() {
        assert_eq!(lookup_deposit(Some("ABC")), None);
    }

    #[test]
    fn test_ctype_resolution() {
        let info = lookup_deposit(Some("3400")).unwrap();
        assert_eq!(info.name, "C-Type");
        assert_eq!(info.key, "CTYPE");
        assert_eq!(info.base_code, 1700);
        assert_eq!(info.deposits, 2);
        assert_eq!(info.category, "Rock Deposits");
    }

    #[test]
    fn test_prefix_is_ignored_for_arithmetic() {
        let info = lookup_deposit(Some("E3800")).unwrap();
        assert_eq!(info.name, "E-Type");
        assert_eq!(info.base_code, 1900);
        assert_eq!(info.deposits, 2);
    }

    #[test]
    fn test_unresolvable_code() {
        assert_eq!(lookup_deposit(Some("9999999")), None);
    }

    #[test]
    fn test_zero_code_does_not_resolve() {
        assert_eq!(lookup_deposit(Some("0")), None);
        assert_eq!(lookup_deposit(Some("000")), None);
    }

    #[test]
    fn test_deterministic() {
        let a = lookup_deposit(Some("3400"));
        let b = lookup_deposit(Some("3400"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_divisor_in_table_order_wins() {
        // 620 * 2000 is divisible by both GEMS (620) and SALVAGE (2000);
        // GEMS appears first in the canonical table.
        let info = lookup_deposit(Some("1240000")).unwrap();
        assert_eq!(info.key, "GEMS");
        assert_eq!(info.base_code, 620);
        assert_eq!(info.deposits, 2000);
    }

    #[test]
    fn test_single_deposit() {
        let info = lookup_deposit(Some("1700")).unwrap();
        assert_eq!(info.deposits, 1);
        assert!(info.deposits >= 1);
    }
}

//! Affix point budget
//!
//! Derives the integer point budget for one generation event from the
//! host's wealth signal and the item's quality tier. Pure function of the
//! signals at call time; callers compute it once per generation and never
//! re-derive it later.

use crate::host::{HostContext, Quality};

/// Wealth divisor: 1M wealth saturates the wealth term.
const WEALTH_PER_POINT: f32 = 166_666.0;
/// Cap on the wealth term.
const MAX_WEALTH_POINTS: f32 = 6.0;
/// Divisor for the squared quality rank.
const QUALITY_DIVISOR: f32 = 4.5;
/// Hard cap on the whole budget.
const MAX_POINTS: f32 = 12.0;

/// Compute the affix point budget for an item.
///
/// Wealth contributes up to 6 points (best-available metric, zero while
/// the game is not in a live state); quality contributes roughly
/// 1/2/4/6/8 points across the five tiers (rank squared over 4.5). The
/// total is clamped to [0, 12] and rounded to the nearest integer.
pub fn affix_budget(host: &dyn HostContext, quality: Quality) -> i32 {
    let wealth = if host.is_live() {
        host.wealth().unwrap_or(0.0)
    } else {
        0.0
    };

    let wealth_points = (wealth / WEALTH_PER_POINT).min(MAX_WEALTH_POINTS);
    let quality_points = (quality.rank() as f32).powi(2) / QUALITY_DIVISOR;

    (wealth_points + quality_points).clamp(0.0, MAX_POINTS).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FixedHost;

    #[test]
    fn test_budget_bounds() {
        let qualities = [
            Quality::Normal,
            Quality::Good,
            Quality::Excellent,
            Quality::Masterwork,
            Quality::Legendary,
        ];
        for wealth in [0.0, 1_000.0, 500_000.0, 1_000_000.0, 1e9] {
            for quality in qualities {
                let pts = affix_budget(&FixedHost::live(wealth), quality);
                assert!((0..=12).contains(&pts), "wealth {wealth} quality {quality:?} -> {pts}");
            }
        }
    }

    #[test]
    fn test_wealth_term_saturates() {
        let at_cap = affix_budget(&FixedHost::live(1_000_000.0), Quality::Normal);
        let beyond = affix_budget(&FixedHost::live(1e12), Quality::Normal);
        assert_eq!(at_cap, beyond);
        // 6 wealth + 0.89 quality ~= 7
        assert_eq!(at_cap, 7);
    }

    #[test]
    fn test_quality_scales_budget() {
        let host = FixedHost::live(0.0);
        assert_eq!(affix_budget(&host, Quality::Normal), 1); // 4/4.5
        assert_eq!(affix_budget(&host, Quality::Good), 2); // 9/4.5
        assert_eq!(affix_budget(&host, Quality::Excellent), 4); // 16/4.5
        assert_eq!(affix_budget(&host, Quality::Masterwork), 6); // 25/4.5
        assert_eq!(affix_budget(&host, Quality::Legendary), 8); // 36/4.5
    }

    #[test]
    fn test_not_live_ignores_wealth() {
        let host = FixedHost { live: false, wealth: Some(1e9) };
        assert_eq!(affix_budget(&host, Quality::Normal), 1);
    }

    #[test]
    fn test_missing_wealth_is_zero() {
        let host = FixedHost { live: true, wealth: None };
        assert_eq!(affix_budget(&host, Quality::Legendary), 8);
    }
}

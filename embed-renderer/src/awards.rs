//! Award tallies grouped into price tiers.

use crate::interval::Interval;
use redditembed_core::text::group_thousands;
use redditembed_core::Awardable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardTier {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl AwardTier {
    /// Highest tier first; a price lands in the first tier that contains it.
    pub const ALL: [AwardTier; 4] = [
        AwardTier::Platinum,
        AwardTier::Gold,
        AwardTier::Silver,
        AwardTier::Bronze,
    ];

    pub fn price_range(self) -> Interval<u64> {
        match self {
            AwardTier::Platinum => Interval::at_least(1800),
            AwardTier::Gold => Interval::half_open(500, 1800),
            AwardTier::Silver => Interval::half_open(100, 500),
            AwardTier::Bronze => Interval::half_open(0, 100),
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            AwardTier::Platinum => "💎",
            AwardTier::Gold => "🥇",
            AwardTier::Silver => "🥈",
            AwardTier::Bronze => "🥉",
        }
    }

    pub fn for_price(price: u64) -> Self {
        Self::ALL
            .into_iter()
            .find(|tier| tier.price_range().contains_value(&price))
            .unwrap_or(AwardTier::Bronze)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AwardTierTally {
    pub platinum: u64,
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
}

impl AwardTierTally {
    pub fn count(&self, tier: AwardTier) -> u64 {
        match tier {
            AwardTier::Platinum => self.platinum,
            AwardTier::Gold => self.gold,
            AwardTier::Silver => self.silver,
            AwardTier::Bronze => self.bronze,
        }
    }

    fn slot(&mut self, tier: AwardTier) -> &mut u64 {
        match tier {
            AwardTier::Platinum => &mut self.platinum,
            AwardTier::Gold => &mut self.gold,
            AwardTier::Silver => &mut self.silver,
            AwardTier::Bronze => &mut self.bronze,
        }
    }

    pub fn is_empty(&self) -> bool {
        AwardTier::ALL.iter().all(|tier| self.count(*tier) == 0)
    }
}

pub fn tally(awardable: &impl Awardable) -> AwardTierTally {
    let mut tally = AwardTierTally::default();
    for award in awardable.awards() {
        *tally.slot(AwardTier::for_price(award.price)) += award.count;
    }
    tally
}

/// Compact summary such as `🥇2🥈1,204`. Empty tiers are skipped.
pub fn format(tally: &AwardTierTally) -> String {
    AwardTier::ALL
        .iter()
        .filter(|tier| tally.count(**tier) > 0)
        .map(|tier| {
            let count = i64::try_from(tally.count(*tier)).unwrap_or(i64::MAX);
            format!("{}{}", tier.glyph(), group_thousands(count))
        })
        .collect()
}

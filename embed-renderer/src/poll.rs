//! Poll results: vote percentages, bar rendering and the poll embed.

use crate::classify::{ClassifiedSubmission, ContentShape};
use crate::embed::EmbedDescriptor;
use chrono::{DateTime, Utc};
use redditembed_core::text::group_thousands;
use redditembed_core::PollData;

pub const BAR_SEGMENTS: u32 = 10;
pub const EMPTY_SEGMENT: &str = "⬛";
pub const FILLED_SEGMENTS: [&str; 6] = ["🟥", "🟧", "🟨", "🟩", "🟦", "🟪"];

pub const ACTIVE_POLL_MESSAGE: &str =
    "This poll is still open, results will be available once voting ends.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptionResult {
    pub text: String,
    pub votes: u64,
}

/// Vote state of a poll at the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSnapshot {
    pub total_votes: u64,
    pub voting_end: DateTime<Utc>,
    pub options: Vec<PollOptionResult>,
}

impl PollSnapshot {
    pub fn from_poll_data(poll: &PollData) -> Self {
        Self {
            total_votes: poll.total_vote_count,
            voting_end: poll.voting_end,
            options: poll
                .options
                .iter()
                .map(|option| PollOptionResult {
                    text: option.text.clone(),
                    votes: option.vote_count.unwrap_or(0),
                })
                .collect(),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.voting_end
    }

    /// Per-option results stay hidden until voting has closed.
    pub fn results_visible(&self, now: DateTime<Utc>) -> bool {
        !self.is_active(now)
    }

    pub fn percentage(&self, votes: u64) -> u32 {
        vote_percentage(votes, self.total_votes)
    }

    /// `<bar> <count> vote(s) (<pct>%)` for the option at `position`.
    pub fn option_line(&self, position: usize, option: &PollOptionResult) -> String {
        let percentage = self.percentage(option.votes);
        format!(
            "{} {} {} ({}%)",
            render_bar(percentage, position),
            group_thousands(i64::try_from(option.votes).unwrap_or(i64::MAX)),
            if option.votes == 1 { "vote" } else { "votes" },
            percentage
        )
    }
}

/// Share of `total` as a whole percentage, rounded half up.
pub fn vote_percentage(votes: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let votes = u128::from(votes);
    let total = u128::from(total);
    ((votes * 200 + total) / (total * 2)) as u32
}

/// Filled segments for a percentage: the nearest multiple of ten with ties
/// going to the even multiple, so 45 gives 4 and 55 gives 6.
pub fn filled_segments(percentage: u32) -> u32 {
    let tens = percentage / 10;
    let rest = percentage % 10;
    let rounded = if rest > 5 || (rest == 5 && tens % 2 == 1) {
        tens + 1
    } else {
        tens
    };
    rounded.min(BAR_SEGMENTS)
}

pub fn render_bar(percentage: u32, position: usize) -> String {
    let filled = filled_segments(percentage) as usize;
    let glyph = FILLED_SEGMENTS[position % FILLED_SEGMENTS.len()];
    let mut bar = glyph.repeat(filled);
    bar.push_str(&EMPTY_SEGMENT.repeat(BAR_SEGMENTS as usize - filled));
    bar
}

pub fn poll_snapshot(classified: &ClassifiedSubmission<'_>) -> Option<PollSnapshot> {
    if classified.shape() != ContentShape::Poll {
        return None;
    }
    classified
        .submission()
        .poll_data
        .as_ref()
        .map(PollSnapshot::from_poll_data)
}

pub fn render_poll(classified: &ClassifiedSubmission<'_>) -> Option<EmbedDescriptor> {
    render_poll_at(classified, Utc::now())
}

pub fn render_poll_at(
    classified: &ClassifiedSubmission<'_>,
    now: DateTime<Utc>,
) -> Option<EmbedDescriptor> {
    let snapshot = poll_snapshot(classified)?;
    let submission = classified.submission();
    let active = snapshot.is_active(now);

    let summary = format!(
        "{} {} • {}",
        group_thousands(i64::try_from(snapshot.total_votes).unwrap_or(i64::MAX)),
        if snapshot.total_votes == 1 { "vote" } else { "votes" },
        if active { "Voting open" } else { "Voting closed" }
    );

    let mut embed = EmbedDescriptor::new(&submission.title)
        .url(format!("https://www.reddit.com{}", submission.permalink))
        .author(&summary, None, None)
        .footer("Voting ends at", None)
        .timestamp(snapshot.voting_end);

    if !snapshot.results_visible(now) {
        return Some(embed.description(ACTIVE_POLL_MESSAGE));
    }

    for (position, option) in snapshot.options.iter().enumerate() {
        embed = embed.field(&option.text, &snapshot.option_line(position, option), false);
    }
    Some(embed)
}

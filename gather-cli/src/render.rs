//! Terminal rendering for gather-core types.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use gather_core::feed::{Feed, FeedEntry, FeedItem};
use gather_core::{Membership, MembershipError, Role, TimeBucket};
use owo_colors::OwoColorize;

/// Display settings shared by every renderer
pub struct Style {
    pub tz: Tz,
}

impl Style {
    /// Falls back to UTC for an unset or unknown time zone.
    pub fn from_timezone(name: Option<&str>) -> Self {
        let tz = name
            .and_then(|n| match n.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::warn!(timezone = n, "Unknown time zone, using UTC");
                    None
                }
            })
            .unwrap_or(Tz::UTC);
        Style { tz }
    }

    pub fn time(&self, dt: DateTime<Utc>) -> String {
        dt.with_timezone(&self.tz).format("%a %b %-d %H:%M").to_string()
    }
}

pub trait Render {
    fn render(&self, style: &Style) -> String;
}

impl Render for FeedItem {
    fn render(&self, style: &Style) -> String {
        let (tag, seats) = match &self.entry {
            FeedEntry::Event(e) => (e.kind.to_string(), seats(e)),
            FeedEntry::Series(s) => (format!("series, {} events", s.events.len()), seats(s)),
        };
        let when = match self.bucket {
            TimeBucket::Ongoing => format!("until {}", style.time(self.span.end)),
            _ => style.time(self.span.start),
        };

        format!(
            "  {} {} {} {}",
            when,
            self.entry.title().bold(),
            format!("[{}]", tag).dimmed(),
            seats.dimmed()
        )
    }
}

impl Render for Feed {
    fn render(&self, style: &Style) -> String {
        if self.is_empty() {
            return "Nothing ongoing or upcoming".dimmed().to_string();
        }

        let mut lines = Vec::new();

        if !self.ongoing.is_empty() {
            lines.push(self.ongoing_heading().green().to_string());
            lines.extend(self.ongoing.iter().map(|item| item.render(style)));
        }

        if !self.upcoming.is_empty() {
            if !self.ongoing.is_empty() {
                lines.push(String::new());
            }
            lines.push(self.upcoming_heading().cyan().to_string());
            lines.extend(self.upcoming.iter().map(|item| item.render(style)));
        }

        for dangling in &self.dangling {
            lines.push(format!("warning: {}", dangling).yellow().to_string());
        }

        lines.join("\n")
    }
}

fn seats<E: Membership>(entity: &E) -> String {
    format!(
        "{}/{}",
        entity.participants().len(),
        entity.max_participants()
    )
}

pub fn role(role: Role) -> String {
    match role {
        Role::Owner => role.to_string().magenta().to_string(),
        Role::Member => role.to_string().green().to_string(),
        Role::NonMember => role.to_string().dimmed().to_string(),
    }
}

/// User-facing wording for a rejected join/quit.
pub fn rejection(err: &MembershipError) -> String {
    match err {
        MembershipError::CapacityExceeded { .. } => "Sorry, this activity is already full.".into(),
        MembershipError::AlreadyMember { .. } => "You are already taking part.".into(),
        MembershipError::NotAMember { .. } => "You are not taking part in this activity.".into(),
        MembershipError::OwnerCannotQuit { .. } => {
            "You organize this activity and cannot leave it. Delete it instead.".into()
        }
        MembershipError::Store(e) => format!("Could not update participation: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        assert_eq!(Style::from_timezone(Some("Mars/Olympus")).tz, Tz::UTC);
        assert_eq!(Style::from_timezone(None).tz, Tz::UTC);
    }

    #[test]
    fn test_time_uses_configured_zone() {
        let style = Style::from_timezone(Some("Europe/Amsterdam"));
        let dt = Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();

        assert_eq!(style.time(dt), "Wed Jan 15 15:30");
    }
}

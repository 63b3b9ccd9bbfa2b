use anyhow::Result;
use chrono::{DateTime, Utc};
use gather_core::config::Gather;

use crate::render::{Render, Style};

pub async fn run(gather: &Gather, now: DateTime<Utc>, all: bool) -> Result<()> {
    let catalog = gather.catalog();

    let feed = if all {
        catalog.feed(now).await?
    } else {
        catalog.personal_feed(now, gather.current_user()?).await?
    };

    let style = Style::from_timezone(gather.config().timezone.as_deref());
    println!("{}", feed.render(&style));

    Ok(())
}

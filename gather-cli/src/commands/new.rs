use anyhow::Result;
use chrono::{DateTime, Utc};
use gather_core::config::Gather;
use gather_core::{Event, EventKind, Series, Visibility};
use owo_colors::OwoColorize;

pub struct NewEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub kind: EventKind,
    pub max: u32,
    pub private: bool,
    pub series: Option<String>,
}

fn visibility(private: bool) -> Visibility {
    if private {
        Visibility::Private
    } else {
        Visibility::Public
    }
}

pub async fn event(gather: &Gather, args: NewEvent) -> Result<()> {
    let owner = gather.current_user()?;
    let catalog = gather.catalog();

    let mut event = Event::new(
        args.kind,
        &args.title,
        args.start,
        args.duration_minutes,
        args.max,
        owner,
    );
    event.visibility = visibility(args.private);

    match args.series {
        Some(series_id) => {
            let (event, series) = catalog.create_event_in_series(&series_id, event).await?;
            println!("{} {} {}", "Created".green(), event.title, event.id.dimmed());
            println!("{} to {}", "Added".green(), series.title);
        }
        None => {
            let event = catalog.create_event(event).await?;
            println!("{} {} {}", "Created".green(), event.title, event.id.dimmed());
        }
    }

    Ok(())
}

pub async fn series(
    gather: &Gather,
    title: &str,
    start: DateTime<Utc>,
    max: u32,
    private: bool,
) -> Result<()> {
    let owner = gather.current_user()?;
    let catalog = gather.catalog();

    let mut series = Series::new(title, start, max, owner);
    series.visibility = visibility(private);

    let series = catalog.create_series(series).await?;
    println!("{} {} {}", "Created".green(), series.title, series.id.dimmed());

    Ok(())
}

use anyhow::Result;
use chrono::{DateTime, Utc};
use gather_core::config::Gather;
use gather_core::{Membership, Span};
use owo_colors::OwoColorize;

use crate::Target;
use crate::render::{Style, role};

pub async fn run(gather: &Gather, target: Target, id: &str) -> Result<()> {
    let catalog = gather.catalog();
    let repo = catalog.repository();
    let style = Style::from_timezone(gather.config().timezone.as_deref());
    let now = Utc::now();

    match target {
        Target::Event => {
            let event = repo.get_event(id).await?;
            print_common(gather, &style, &event.title, event.span(), &event, now);
            println!("  kind:        {}", event.kind);
            if let Some(location) = &event.location {
                println!("  where:       {}", location.name);
            }
            if let Some(series) = catalog.owning_series(id).await? {
                println!("  series:      {} {}", series.title, series.id.dimmed());
            }
        }
        Target::Series => {
            let series = repo.get_series(id).await?;
            let events = repo.list_events().await?;
            let resolution =
                series.resolve_span(|event_id| events.iter().find(|e| e.id == event_id));
            print_common(gather, &style, &series.title, resolution.span, &series, now);
            println!("  events:      {}", series.events.len());
            for dangling in &resolution.dangling {
                println!("  {}", format!("missing event {}", dangling.event_id).yellow());
            }
        }
    }

    Ok(())
}

fn print_common<E: Membership>(
    gather: &Gather,
    style: &Style,
    title: &str,
    span: Span,
    entity: &E,
    now: DateTime<Utc>,
) {
    println!("{}", title.bold());
    println!(
        "  when:        {} - {} ({})",
        style.time(span.start),
        style.time(span.end),
        span.classify(now)
    );
    println!(
        "  seats:       {}/{}",
        entity.participants().len(),
        entity.max_participants()
    );
    println!("  organizer:   {}", entity.owner());
    if let Ok(user) = gather.current_user() {
        println!("  you:         {}", role(entity.role_of(user)));
    }
}

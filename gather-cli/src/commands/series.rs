use anyhow::Result;
use gather_core::config::Gather;
use gather_core::label::label;
use owo_colors::OwoColorize;

pub async fn attach(gather: &Gather, series_id: &str, event_id: &str) -> Result<()> {
    let actor = gather.current_user()?;
    let series = gather
        .catalog()
        .attach_event(series_id, event_id, actor)
        .await?;

    println!(
        "{} {} now has {} events",
        "Attached".green(),
        series.title,
        series.events.len()
    );
    Ok(())
}

pub async fn detach(gather: &Gather, series_id: &str, event_id: &str) -> Result<()> {
    let actor = gather.current_user()?;
    let series = gather
        .catalog()
        .detach_event(series_id, event_id, actor)
        .await?;

    println!(
        "{} {} now has {} events",
        "Detached".yellow(),
        series.title,
        series.events.len()
    );
    Ok(())
}

pub async fn delete(gather: &Gather, series_id: &str) -> Result<()> {
    let actor = gather.current_user()?;
    let detached = gather.catalog().delete_series(series_id, actor).await?;

    println!("{} {}", "Deleted".red(), series_id);
    if !detached.is_empty() {
        let noun = label(detached.len(), "event", "events");
        println!(
            "{}",
            format!("{} {} kept as standalone", detached.len(), noun).dimmed()
        );
    }
    Ok(())
}

use anyhow::Result;
use gather_core::config::Gather;
use gather_core::{Event, Membership, MembershipError, Series};
use owo_colors::OwoColorize;

use crate::Target;
use crate::render::rejection;

pub async fn join(gather: &Gather, target: Target, id: &str) -> Result<()> {
    let user = gather.current_user()?;
    let catalog = gather.catalog();
    let members = catalog.membership();

    let result = match target {
        Target::Event => members
            .join_by_id::<Event>(id, user)
            .await
            .map(|e| summary(&e.title, &e)),
        Target::Series => members
            .join_by_id::<Series>(id, user)
            .await
            .map(|s| summary(&s.title, &s)),
    };

    report(result, "Joined")
}

pub async fn quit(gather: &Gather, target: Target, id: &str) -> Result<()> {
    let user = gather.current_user()?;
    let catalog = gather.catalog();
    let members = catalog.membership();

    let result = match target {
        Target::Event => members
            .quit_by_id::<Event>(id, user)
            .await
            .map(|e| summary(&e.title, &e)),
        Target::Series => members
            .quit_by_id::<Series>(id, user)
            .await
            .map(|s| summary(&s.title, &s)),
    };

    report(result, "Left")
}

fn summary<E: Membership>(title: &str, entity: &E) -> String {
    format!(
        "{} ({}/{} participants)",
        title,
        entity.participants().len(),
        entity.max_participants()
    )
}

fn report(result: Result<String, MembershipError>, verb: &str) -> Result<()> {
    match result {
        Ok(summary) => {
            println!("{} {}", verb.green(), summary);
            Ok(())
        }
        Err(MembershipError::Store(e)) => Err(e.into()),
        Err(e) => anyhow::bail!(rejection(&e)),
    }
}

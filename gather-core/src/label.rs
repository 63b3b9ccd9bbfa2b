//! Count-aware section headings.

pub const ONGOING_SINGULAR: &str = "your ongoing activity :";
pub const ONGOING_PLURAL: &str = "your ongoing activities :";
pub const UPCOMING_SINGULAR: &str = "your upcoming activity :";
pub const UPCOMING_PLURAL: &str = "your upcoming activities :";

/// Singular text for exactly one item, plural text otherwise (zero included).
pub fn label(count: usize, singular: &str, plural: &str) -> String {
    let text = if count == 1 { singular } else { plural };
    text.to_string()
}

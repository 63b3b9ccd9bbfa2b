pub mod feed;
pub mod membership;
pub mod new;
pub mod series;
pub mod show;

pub mod classify;
pub mod config;
pub mod discography;
pub mod identity;
pub mod search;

pub use classify::run_classify;
pub use discography::run_discography;
pub use identity::run_identity;
pub use search::run_search;

use discern_core::ScoredResult;

/// `Artist - Title (Year)` for terminal output.
fn describe(result: &ScoredResult) -> String {
    match result.year {
        Some(year) => format!("{} - {} ({year})", result.artist, result.title),
        None => format!("{} - {}", result.artist, result.title),
    }
}

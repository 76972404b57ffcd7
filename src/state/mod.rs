//! Run-scoped shared state
//!
//! Everything here lives exactly as long as one harvesting run and is the only
//! state workers share with each other.

mod listing_audio;
mod visited;

pub use listing_audio::{merge_unique, ListingAudioIndex};
pub use visited::VisitedPosts;

/// State created at the start of a run and dropped at its end
#[derive(Debug, Default)]
pub struct RunState {
    pub visited: VisitedPosts,
    pub listing_audio: ListingAudioIndex,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }
}

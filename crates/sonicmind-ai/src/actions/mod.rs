//! Side-effecting adapters: opening URLs, video playback and web search.

pub mod browser;
pub mod web;
pub mod youtube;

pub use browser::Browser;
pub use web::GoogleSearch;
pub use youtube::YouTubePlayer;

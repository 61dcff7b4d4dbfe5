// Matchday Infrastructure - Football Feed Adapter
// Implements: FootballFeed over the football-data.org v4 REST API

mod client;

pub use client::{FeedSettings, HttpFootballFeed, API_KEY_HEADER, DEFAULT_BASE_URL, DEFAULT_COMPETITION};

use std::path::Path;

use znak_core::catalogue::open_catalogue;
use znak_core::geometry::Ellipse;
use znak_core::matcher::{MatchOptions, SignMatch, SignMatcher};
use znak_core::sign::{QueryError, UserSign};

use super::open_videos;
use crate::CliError;

/// Raw query flags as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub shapes: Vec<u8>,
    pub sign_type: String,
    pub passive: Option<u8>,
    /// `"cx,cy,a,b,angle"`
    pub ellipse: Option<String>,
}

impl SearchQuery {
    pub fn to_user_sign(&self) -> Result<UserSign, CliError> {
        let placement = match &self.ellipse {
            Some(text) => {
                let e = text.parse::<Ellipse>().map_err(QueryError::from)?;
                Some([e.center.x, e.center.y, e.a, e.b, e.angle])
            }
            None => None,
        };
        Ok(UserSign::from_query(
            &self.shapes,
            &self.sign_type,
            self.passive,
            placement,
        )?)
    }
}

pub fn run_search(
    db: &Path,
    videos: Option<&Path>,
    query: &SearchQuery,
    options: MatchOptions,
) -> Result<Vec<SignMatch>, CliError> {
    let user = query.to_user_sign()?;
    let catalogue = open_catalogue(db)?;
    let matcher = SignMatcher::try_new(catalogue, open_videos(videos)?, options)?;
    Ok(matcher.search(&user))
}

pub fn search(db: &Path, videos: Option<&Path>, query: &SearchQuery, json: bool) {
    let options = MatchOptions::from_settings(znak_core::settings::settings());
    let results = die!(run_search(db, videos, query, options), "Error: {}");

    if json {
        let out = die!(serde_json::to_string_pretty(&results), "Error: {}");
        println!("{out}");
        return;
    }

    if results.is_empty() {
        println!("No matching signs.");
        return;
    }
    println!(
        "{:>3}  {:>6}  {:>5} {:>5} {:>5}  text",
        "#", "total", "shape", "type", "place"
    );
    for (rank, m) in results.iter().enumerate() {
        let video = m
            .video
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("{} (no video)", m.video_id));
        println!(
            "{:>3}  {:>6.3}  {:>5.2} {:>5.2} {:>5.2}  {}  [{}]",
            rank + 1,
            m.distance.total(),
            m.distance.active,
            m.distance.sign_type,
            m.distance.placement,
            m.text,
            video
        );
    }
}

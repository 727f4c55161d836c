use std::path::Path;

use znak_core::catalogue::open_catalogue;
use znak_core::lookup::{WordLookup, WordMatch};

use super::open_videos;
use crate::CliError;

fn open_lookup(db: &Path, videos: Option<&Path>) -> Result<WordLookup, CliError> {
    Ok(WordLookup::new(open_catalogue(db)?, open_videos(videos)?))
}

pub fn run_lookup(
    db: &Path,
    videos: Option<&Path>,
    word: &str,
) -> Result<Vec<WordMatch>, CliError> {
    Ok(open_lookup(db, videos)?.lookup(word)?)
}

pub fn lookup(db: &Path, videos: Option<&Path>, word: &str, json: bool) {
    let found = die!(run_lookup(db, videos, word), "Error: {}");
    if json {
        let out = die!(serde_json::to_string_pretty(&found), "Error: {}");
        println!("{out}");
        return;
    }
    if found.is_empty() {
        println!("{word}: not found");
        return;
    }
    for m in &found {
        match &m.video {
            Some(path) => println!("{}\t{}", m.word, path.display()),
            None => println!("{}\t{} (no video)", m.word, m.video_id),
        }
    }
}

pub fn words(db: &Path) {
    let lookup = die!(open_lookup(db, None), "Error: {}");
    let words = die!(lookup.sorted_words(), "Error: {}");
    for word in &words {
        println!("{word}");
    }
    eprintln!("{} words", words.len());
}

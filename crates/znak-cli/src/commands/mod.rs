macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod catalogue_ops;
pub mod config_ops;
pub mod search_ops;
pub mod word_ops;

use std::path::Path;

use znak_core::video::VideoDirectory;

use crate::CliError;

/// The video directory, or an empty one when none is given.
pub fn open_videos(dir: Option<&Path>) -> Result<VideoDirectory, CliError> {
    match dir {
        Some(dir) => VideoDirectory::open(dir).map_err(CliError::Videos),
        None => Ok(VideoDirectory::empty()),
    }
}

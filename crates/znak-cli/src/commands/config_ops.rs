use std::fs;

pub fn settings_export() {
    print!("{}", znak_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        znak_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: search.signs_max={}, search.display_max_len={}, canvas={}x{}",
        s.search.signs_max, s.search.display_max_len, s.canvas.width, s.canvas.height
    );
}

/// Install a custom settings file before any command reads settings.
pub fn load_settings(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(
        znak_core::settings::init_custom(content),
        "Error in {file}: {}"
    );
}

use crate::errors::CliError;
use camino::Utf8Path;
use etg_assets::{AssetMap, AssetsConfig};
use regex::Regex;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Build an overlay from a resources directory or a zip archive.
pub fn open_source(path: &Utf8Path, config: AssetsConfig) -> Result<AssetMap, CliError> {
    let std_path = path.as_std_path();
    if !std_path.exists() {
        return Err(CliError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut map = AssetMap::new(config);
    let crawled = if std_path.is_dir() {
        map.crawl_dir(path)
    } else if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        map.crawl_archive(path)
    } else {
        return Err(CliError::UnsupportedSource {
            path: path.to_path_buf(),
        });
    };

    crawled.map_err(|source| CliError::CrawlFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(map)
}

/// Prints the provided lines inside an ASCII box
pub fn print_ansi_boxed_lines(lines: &[String]) {
    let ansi = Regex::new("\x1b\\[[0-9;]*m").unwrap();
    let visible_len = |s: &str| ansi.replace_all(s, "").chars().count();

    let width = lines
        .iter()
        .map(|s| visible_len(s.as_str()))
        .max()
        .unwrap_or(0);

    let border = "-".repeat(width + 4);
    println_pad!("{}", border);
    for line in lines {
        let pad = width - visible_len(line.as_str());
        println_pad!("| {}{} |", line, " ".repeat(pad));
    }
    println_pad!("{}", border);
}

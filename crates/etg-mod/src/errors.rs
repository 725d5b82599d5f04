use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Source not found: {path}")]
    #[diagnostic(
        code(source::not_found),
        help("Pass a resources directory or a .zip mod archive")
    )]
    SourceNotFound { path: Utf8PathBuf },

    #[error("Unsupported source: {path}")]
    #[diagnostic(
        code(source::unsupported),
        help("Only directories and .zip archives can be crawled")
    )]
    UnsupportedSource { path: Utf8PathBuf },

    #[error("Failed to crawl {path}")]
    #[diagnostic(code(source::crawl_failed))]
    CrawlFailed {
        path: Utf8PathBuf,
        #[source]
        source: etg_assets::Error,
    },

    #[error("Nothing is mapped under {path}")]
    #[diagnostic(
        code(overlay::not_mapped),
        help("Paths are case-insensitive; use `etg-mod map` to list what the source provides")
    )]
    PathNotMapped { path: String },

    #[error("No sprite group named {name}")]
    #[diagnostic(
        code(sprites::group_not_found),
        help("Sprite groups come from textures below sprites/<group>/")
    )]
    SpriteGroupNotFound { name: String },

    #[error("No {phase} sequence for {base} in {collection}")]
    #[diagnostic(
        code(sprites::sequence_not_found),
        help("Frame names must look like <base>_<phase>_<order>.png")
    )]
    SequenceNotFound {
        collection: String,
        base: String,
        phase: String,
    },

    #[error("Invalid id file: {path}")]
    #[diagnostic(
        code(ids::invalid_file),
        help("The file must contain a JSON object mapping ids to labels")
    )]
    InvalidIdFile {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(config::not_found),
        help("Check the path passed with --config, or omit it to use the defaults")
    )]
    ConfigNotFound { path: Utf8PathBuf },

    #[error("Configuration file error")]
    #[diagnostic(
        code(config::parse_error),
        help("Check your etg-mod.toml file for syntax errors")
    )]
    ConfigParseError {
        #[source]
        source: etg_assets::Error,
    },

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::open_source;
use camino::Utf8PathBuf;
use colored::Colorize;
use etg_assets::{decode_png, AssetKind, AssetsConfig};
use miette::IntoDiagnostic;

pub struct ResolveArgs {
    pub source: Utf8PathBuf,
    pub path: String,
    pub dirs: bool,
}

pub fn resolve_path(args: ResolveArgs, config: AssetsConfig) -> miette::Result<()> {
    let map = open_source(&args.source, config)?;
    let mapped = map
        .resolve_entry(&args.path, args.dirs)
        .ok_or_else(|| CliError::PathNotMapped {
            path: args.path.clone(),
        })?;
    let metadata = &mapped.metadata;

    println_pad!(
        "{} {}",
        "🔎 Resolved:".bright_blue().bold(),
        mapped.path.bright_cyan().bold()
    );
    println_pad!(
        "{} {}",
        "📦 Source:".bright_green(),
        metadata.container().to_string().bright_white()
    );
    if let Some(kind) = metadata.kind() {
        println_pad!(
            "{} {}",
            "🏷️ Kind:".bright_yellow(),
            format!("{:?}", kind).bright_white()
        );
    }
    if metadata.length() > 0 {
        println_pad!(
            "{} {}",
            "✂️ Range:".bright_yellow(),
            format!("{}..{}", metadata.offset(), metadata.offset() + metadata.length())
                .bright_white()
        );
    }

    let Some(bytes) = metadata.read_all().into_diagnostic()? else {
        println_pad!("{}", "(no payload)".dimmed());
        return Ok(());
    };
    println_pad!(
        "{} {}",
        "📏 Size:".bright_yellow(),
        format!("{} bytes", bytes.len()).bright_white()
    );

    if metadata.kind() == Some(AssetKind::Texture) {
        match decode_png(&mapped.path, &bytes) {
            Ok(image) => println_pad!(
                "{} {}",
                "🖼️ Image:".bright_yellow(),
                format!("{}x{}", image.width(), image.height()).bright_white()
            ),
            Err(e) => tracing::warn!("{}", e),
        }
    }

    Ok(())
}

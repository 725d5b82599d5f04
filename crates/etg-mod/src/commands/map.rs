use crate::println_pad;
use crate::utils::open_source;
use camino::Utf8PathBuf;
use colored::Colorize;
use etg_assets::{AssetsConfig, MappedAsset};

pub struct MapArgs {
    pub source: Utf8PathBuf,
    pub dirs: bool,
}

fn sorted(assets: impl Iterator<Item = MappedAsset>) -> Vec<MappedAsset> {
    let mut assets: Vec<_> = assets.collect();
    assets.sort_by(|a, b| a.path.to_lowercase().cmp(&b.path.to_lowercase()));
    assets
}

pub fn show_map(args: MapArgs, config: AssetsConfig) -> miette::Result<()> {
    let map = open_source(&args.source, config)?;

    println_pad!(
        "{} {} {}",
        "🗂️ Overlay:".bright_blue().bold(),
        args.source.as_str().bright_cyan().bold(),
        format!("({} assets, {} directories)", map.len(), map.dir_count()).dimmed()
    );

    println_pad!("\n{}", "📄 Assets:".bright_magenta().bold());
    for asset in sorted(map.entries().cloned()) {
        let kind = asset
            .metadata
            .kind()
            .map(|kind| format!("{:?}", kind))
            .unwrap_or_default();
        println_pad!(
            "   {} {} {}",
            format!("{:<8}", kind).bright_green(),
            asset.path.bright_white(),
            format!("<- {}", asset.metadata.container()).dimmed()
        );
    }

    if args.dirs {
        println_pad!("\n{}", "📁 Directories:".bright_magenta().bold());
        for dir in sorted(map.dirs().cloned()) {
            println_pad!(
                "   {} {}",
                "•".bright_cyan(),
                format!("{}/", dir.path).bright_white()
            );
        }
    }

    let mut groups: Vec<_> = map.sprite_collections().collect();
    groups.sort_by(|a, b| a.name().cmp(b.name()));
    if !groups.is_empty() {
        println_pad!("\n{}", "🎞️ Sprite groups:".bright_magenta().bold());
        for group in groups {
            println_pad!(
                "   {} {} {}",
                "•".bright_cyan(),
                group.name().bright_cyan().bold(),
                format!(
                    "({} textures, {} pending)",
                    group.len(),
                    group.unprocessed_count()
                )
                .dimmed()
            );
        }
    }

    Ok(())
}

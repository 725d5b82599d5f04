use crate::errors::CliError;
use crate::println_pad;
use crate::utils::open_source;
use camino::Utf8PathBuf;
use colored::Colorize;
use etg_assets::{handle_sprites, AnimationSpriteCache, AssetsConfig, FrameRef, SpriteCollection};

pub struct FramesArgs {
    pub source: Utf8PathBuf,
    pub collection: String,
    pub base: Option<String>,
    pub phase: Option<String>,
}

fn print_sequence(collection: &SpriteCollection, base: &str, phase: &str, frames: &[FrameRef]) {
    println_pad!(
        "   {} {}",
        format!("{}_{}", base, phase).bright_cyan().bold(),
        format!("({} frames)", frames.len()).dimmed()
    );
    for (order, frame) in frames.iter().enumerate() {
        let name = &collection.frames()[frame.index].name;
        println_pad!(
            "     {} {} {}",
            format!("{:>3}", order).dimmed(),
            name.bright_white(),
            format!("[{}]", frame.index).dimmed()
        );
    }
}

pub fn show_frames(args: FramesArgs, config: AssetsConfig) -> miette::Result<()> {
    let mut map = open_source(&args.source, config)?;
    if map.sprite_collection(&args.collection).is_none() {
        return Err(CliError::SpriteGroupNotFound {
            name: args.collection,
        }
        .into());
    }

    let mut collection = SpriteCollection::new(args.collection.as_str(), Vec::new());
    let report = handle_sprites(&mut map, &mut collection);

    println_pad!(
        "{} {} {}",
        "🎞️ Sprite group:".bright_blue().bold(),
        collection.name().bright_cyan().bold(),
        format!(
            "({} frames added, {} skipped)",
            report.frames_added, report.skipped
        )
        .dimmed()
    );
    if let Some(atlas) = collection.atlas() {
        println_pad!(
            "{} {}",
            "🗺️ Atlas:".bright_green(),
            atlas.container().to_string().bright_white()
        );
    }

    let mut cache = AnimationSpriteCache::new();
    cache.update_collection(&collection);

    match (args.base, args.phase) {
        (Some(base), Some(phase)) => {
            let frames = cache
                .animation_frames(collection.name(), &base, &phase)
                .ok_or_else(|| CliError::SequenceNotFound {
                    collection: collection.name().to_string(),
                    base: base.clone(),
                    phase: phase.clone(),
                })?;
            print_sequence(&collection, &base, &phase, frames);
        }
        (base, phase) => {
            let animations: Vec<(String, String)> = cache
                .animations(collection.name())
                .into_iter()
                .filter(|(b, p)| {
                    base.as_deref().map_or(true, |base| base == *b)
                        && phase.as_deref().map_or(true, |phase| phase == *p)
                })
                .map(|(b, p)| (b.to_string(), p.to_string()))
                .collect();

            if animations.is_empty() {
                println_pad!("\n{}", "No animation sequences found".bright_yellow());
            }
            for (base, phase) in animations {
                if let Some(frames) = cache.animation_frames(collection.name(), &base, &phase) {
                    print_sequence(&collection, &base, &phase, frames);
                }
            }
        }
    }

    Ok(())
}

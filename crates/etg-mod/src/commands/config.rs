use crate::utils::config::{default_config_path, EffectiveConfig};
use crate::utils::print_ansi_boxed_lines;
use colored::Colorize;
use miette::IntoDiagnostic;

pub fn show_config(effective: &EffectiveConfig) -> miette::Result<()> {
    let source = match &effective.path {
        Some(path) => path.to_string().bright_green().to_string(),
        None => {
            let expected = default_config_path()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            format!("{} {}", "(defaults)".bright_yellow(), expected.dimmed())
        }
    };

    println!();
    println!("  {} {}", "config_file:".bright_white(), source);
    println!();

    let rendered = toml::to_string_pretty(&effective.config).into_diagnostic()?;
    let lines: Vec<String> = rendered.lines().map(str::to_string).collect();
    print_ansi_boxed_lines(&lines);
    println!();

    Ok(())
}

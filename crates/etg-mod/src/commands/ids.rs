use crate::errors::CliError;
use crate::println_pad;
use camino::Utf8PathBuf;
use colored::Colorize;
use etg_ids::IdPool;
use miette::IntoDiagnostic;
use std::collections::BTreeMap;

pub struct IdsArgs {
    pub file: Utf8PathBuf,
    /// Namespaces locked before any id is registered.
    pub lock: Vec<String>,
}

/// Register the ids of a JSON file in a fresh pool.
///
/// Returns the pool and the ids that were rejected, with the reason.
pub fn register_ids(
    entries: BTreeMap<String, String>,
    lock: &[String],
) -> (IdPool<String>, Vec<(String, etg_ids::IdError)>) {
    let mut pool = IdPool::new();
    for namespace in lock {
        pool.lock_namespace(namespace.as_str());
    }

    let mut rejected = Vec::new();
    for (id, label) in entries {
        if let Err(e) = pool.add(&id, label) {
            tracing::debug!("Rejected {}: {}", id, e);
            rejected.push((id, e));
        }
    }
    (pool, rejected)
}

pub fn check_ids(args: IdsArgs) -> miette::Result<()> {
    let contents = std::fs::read_to_string(args.file.as_std_path()).into_diagnostic()?;
    let entries: BTreeMap<String, String> =
        serde_json::from_str(&contents).map_err(|source| CliError::InvalidIdFile {
            path: args.file.clone(),
            source,
        })?;

    let (pool, rejected) = register_ids(entries, &args.lock);

    println_pad!(
        "{} {} {}",
        "🆔 Ids:".bright_blue().bold(),
        args.file.as_str().bright_cyan().bold(),
        format!("({} registered, {} rejected)", pool.len(), rejected.len()).dimmed()
    );

    let mut pairs: Vec<_> = pool.pairs().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    for (id, label) in pairs {
        println_pad!(
            "   {} {} {}",
            "•".bright_cyan(),
            id.bright_white(),
            format!("- {}", label).dimmed()
        );
    }

    let mut namespaces: Vec<_> = pool.namespaces().collect();
    namespaces.sort();
    println_pad!(
        "\n{} {}",
        "📚 Namespaces:".bright_magenta().bold(),
        namespaces.join(", ").bright_white()
    );

    if !rejected.is_empty() {
        println_pad!("\n{}", "⚠️ Rejected:".bright_red().bold());
        for (id, error) in rejected {
            println_pad!(
                "   {} {} {}",
                "✗".bright_red(),
                id.bright_white(),
                format!("({})", error).dimmed()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use etg_ids::IdError;

    #[test]
    fn test_register_ids() {
        let entries = BTreeMap::from([
            ("sword".to_string(), "Sword".to_string()),
            ("mymod:shield".to_string(), "Shield".to_string()),
            ("core:gun".to_string(), "Gun".to_string()),
            ("a:b:c".to_string(), "Broken".to_string()),
            ("big axe".to_string(), "Axe".to_string()),
        ]);

        let (pool, rejected) = register_ids(entries, &["core".to_string()]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get("gungeon:sword").unwrap(), "Sword");

        let reasons: BTreeMap<_, _> = rejected.into_iter().collect();
        assert!(matches!(reasons["a:b:c"], IdError::BadlyFormattedId(_)));
        assert!(matches!(reasons["big axe"], IdError::BadIdElement(_)));
        assert!(matches!(reasons["core:gun"], IdError::LockedNamespace(_)));
    }
}

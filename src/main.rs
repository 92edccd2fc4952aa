//! Prints how the translated attributes of one article resolve against a
//! snapshot of translation records.
//!
//! Usage: `record-translations <snapshot.json> <owner-id> [--locale=<code>] [attribute...]`
//!
//! Locales come from `.translations.json` in the current directory.
//! `--locale` switches the active locale for this run. Without attribute
//! names every attribute is printed.

use std::error::Error;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use record_translations::config::ConfigManager;
use record_translations::{
    AttributeOverlay,
    MemoryStore,
    OwnerId,
    Resolver,
    Translatable,
    translatable,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Article {
    id: Option<OwnerId>,
    translations: AttributeOverlay,
}

translatable! {
    Article {
        id: id,
        overlay: translations,
        attributes {
            title => title_mut,
            body => body_mut,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

const USAGE: &str =
    "usage: record-translations <snapshot.json> <owner-id> [--locale=<code>] [attribute...]";

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(snapshot), Some(owner)) = (args.next(), args.next()) else {
        return Err(USAGE.into());
    };
    let owner = OwnerId(owner.parse()?);

    let mut active = None;
    let mut requested = Vec::new();
    for arg in args {
        if let Some(code) = arg.strip_prefix("--locale=") {
            active = Some(code.to_string());
        } else {
            requested.push(arg);
        }
    }
    let attributes = select_attributes(&requested)?;

    let mut config = ConfigManager::new();
    let cwd = std::env::current_dir()?;
    config.load_settings(Some(cwd.as_path()))?;
    let locales = match active {
        Some(code) => config.locale_context_for(&code)?,
        None => config.locale_context(),
    };

    let store = MemoryStore::from_json_file(Path::new(&snapshot))?;
    let article = Article { id: Some(owner), ..Article::default() };
    let resolver = Resolver::new(&store, &locales);

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "article {owner} (active: {}, default: {})",
        locales.active_locale(),
        locales.resolve_default(&article)
    )?;

    for attribute in &attributes {
        match resolver.resolve(&article, attribute) {
            Some(resolution) => writeln!(
                out,
                "  {attribute}: {:?} ({:?}, {})",
                resolution.value, resolution.source, resolution.locale
            )?,
            None => writeln!(out, "  {attribute}: <absent>")?,
        }
    }

    for (locale, values) in article.all_translations(&locales, &store) {
        writeln!(out, "[{locale}]")?;
        for (attribute, value) in values {
            if attributes.iter().any(|selected| *selected == attribute) {
                writeln!(out, "  {attribute} = {value:?}")?;
            }
        }
    }

    Ok(())
}

/// Attributes named on the command line, or all of them when none are.
fn select_attributes(requested: &[String]) -> Result<Vec<&'static str>, Box<dyn Error>> {
    if requested.is_empty() {
        return Ok(Article::ATTRIBUTES.to_vec());
    }

    requested
        .iter()
        .map(|name| {
            Article::ATTRIBUTES.iter().copied().find(|known| *known == name.as_str()).ok_or_else(
                || -> Box<dyn Error> {
                    format!(
                        "unknown attribute '{name}', expected one of: {}",
                        Article::ATTRIBUTES.join(", ")
                    )
                    .into()
                },
            )
        })
        .collect()
}

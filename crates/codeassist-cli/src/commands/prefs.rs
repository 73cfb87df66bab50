//! Preference commands.

use codeassist_ai::AssistConfig;
use codeassist_style::{Indentation, NamingConvention, StylePreferences};

/// Fields to change; `None` keeps the stored value.
#[derive(Debug, Default)]
pub(crate) struct Changes {
    pub indentation: Option<String>,
    pub indent_size: Option<u32>,
    pub max_line_length: Option<u32>,
    pub naming_convention: Option<String>,
}

impl Changes {
    fn apply(self, prefs: &mut StylePreferences) -> miette::Result<()> {
        if let Some(indentation) = self.indentation {
            prefs.indentation = indentation
                .parse::<Indentation>()
                .map_err(|e| miette::miette!("{}", e))?;
        }
        if let Some(size) = self.indent_size {
            prefs.indent_size = size;
        }
        if let Some(length) = self.max_line_length {
            prefs.max_line_length = length;
        }
        if let Some(naming) = self.naming_convention {
            prefs.naming_convention = naming
                .parse::<NamingConvention>()
                .map_err(|e| miette::miette!("{}", e))?;
        }
        Ok(())
    }
}

pub(crate) fn show(config: &AssistConfig) -> miette::Result<()> {
    let store = super::preference_store(config);
    print(&store.load(), &store.path().display().to_string())
}

pub(crate) fn init(config: &AssistConfig) -> miette::Result<()> {
    let store = super::preference_store(config);
    let prefs = store
        .init()
        .map_err(|e| miette::miette!("Failed to initialize preferences: {}", e))?;
    print(&prefs, &store.path().display().to_string())
}

pub(crate) fn set(config: &AssistConfig, changes: Changes) -> miette::Result<()> {
    let store = super::preference_store(config);
    let mut prefs = store.load();
    changes.apply(&mut prefs)?;
    store
        .save(&prefs)
        .map_err(|e| miette::miette!("Failed to save preferences: {}", e))?;
    print(&prefs, &store.path().display().to_string())
}

fn print(prefs: &StylePreferences, path: &str) -> miette::Result<()> {
    let json = serde_json::to_string_pretty(prefs)
        .map_err(|e| miette::miette!("Failed to encode preferences: {}", e))?;
    println!("{}", json);
    eprintln!("({})", path);
    Ok(())
}

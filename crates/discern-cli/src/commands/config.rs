use anyhow::{Context, Result};
use discern_resolve::{config, Config};
use toml_edit::{value, DocumentMut, Item, Table};

/// Settings that `config get` and `config set` understand.
const KEYS: &[&str] = &[
    "apple_music_token",
    "storefront",
    "studio_albums_endpoint",
    "requests_per_second",
    "cache_capacity",
    "search_limit",
    "min_confidence",
];

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    for key in KEYS {
        println!("  {}: {}", key, display_value(config, key)?);
    }
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (DISCERN_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the config file.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        println!("{}", display_value(config, &key)?);
        return Ok(());
    }

    let config_path = config::config_file_path();
    if config_path.exists() {
        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;
        print!("{}", contents);
    } else {
        println!("Config file does not exist: {}", config_path.display());
        println!("\nRun 'discern config init' to create it.");
    }

    Ok(())
}

/// Set a config value in the config file.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let item = typed_item(key, value)?;
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path)
        .context("Failed to read config file")?;
    let contents = apply_setting(&contents, key, item)?;

    std::fs::write(&config_path, contents)
        .context("Failed to write config file")?;

    println!("✓ Updated {}", key);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to add your Apple Music developer token.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!("Unknown config key: {}\n\nValid keys: {}", key, KEYS.join(", "))
}

fn display_value(config: &Config, key: &str) -> Result<String> {
    let not_set = || String::from("<not set>");
    Ok(match key {
        // Never echo the token itself.
        "apple_music_token" => config
            .apple_music_token
            .as_ref()
            .map_or_else(not_set, |_| String::from("<set>")),
        "storefront" => config.storefront.clone(),
        "studio_albums_endpoint" => config.studio_albums_endpoint.clone().unwrap_or_else(not_set),
        "requests_per_second" => config.requests_per_second.to_string(),
        "cache_capacity" => config.cache_capacity.to_string(),
        "search_limit" => config.search_limit.to_string(),
        "min_confidence" => config.min_confidence.to_string(),
        _ => return Err(unknown_key(key)),
    })
}

/// Parse `raw` into the TOML item stored for `key`, validating numbers.
fn typed_item(key: &str, raw: &str) -> Result<Item> {
    match key {
        "apple_music_token" | "storefront" | "studio_albums_endpoint" => Ok(value(raw)),
        "requests_per_second" | "cache_capacity" | "search_limit" => {
            let n: i64 = raw
                .parse()
                .with_context(|| format!("{} must be a whole number", key))?;
            if n < 0 {
                anyhow::bail!("{} must not be negative", key);
            }
            Ok(value(n))
        }
        "min_confidence" => {
            let n: f64 = raw
                .parse()
                .with_context(|| format!("{} must be a number", key))?;
            if !(0.0..=1.0).contains(&n) {
                anyhow::bail!("{} must be between 0.0 and 1.0", key);
            }
            Ok(value(n))
        }
        _ => Err(unknown_key(key)),
    }
}

/// Set a top-level key in a config document, keeping its comments and layout.
fn apply_setting(contents: &str, key: &str, item: Item) -> Result<String> {
    let mut doc = contents
        .parse::<DocumentMut>()
        .context("Config file is not valid TOML")?;
    set_preserving_decor(doc.as_table_mut(), key, item);
    Ok(doc.to_string())
}

fn set_preserving_decor(table: &mut Table, key: &str, item: Item) {
    let decor = table
        .get(key)
        .and_then(|current| current.as_value().map(|v| v.decor().clone()));
    table[key] = item;
    if let Some(decor) = decor {
        if let Some(next) = table[key].as_value_mut() {
            *next.decor_mut() = decor;
        }
    }
}

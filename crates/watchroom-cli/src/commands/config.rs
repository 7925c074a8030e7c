use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchroom_config::{Config, PathManager};

use crate::output::{Output, OutputFormat};

pub fn run_show(config: &Config, output: &Output) -> Result<()> {
    let key = mask_key(&config.catalog.api_key);

    if output.format() != OutputFormat::Human {
        output.json(&json!({
            "catalog": {
                "api_key": key,
                "base_url": config.catalog.base_url,
                "image_base_url": config.catalog.image_base_url,
            },
            "player": {
                "base_url": config.player.base_url,
            },
        }));
        return Ok(());
    }

    output.info(format!("catalog.api_key        {}", key));
    output.info(format!("catalog.base_url       {}", config.catalog.base_url));
    output.info(format!(
        "catalog.image_base_url {}",
        config.catalog.image_base_url
    ));
    output.info(format!("player.base_url        {}", config.player.base_url));
    Ok(())
}

pub fn run_set_key(paths: &PathManager, output: &Output, key: String) -> Result<()> {
    let config_file = paths.config_file();
    let mut config = Config::load_or_default(&config_file).map_err(|e| eyre!("{:#}", e))?;
    config.catalog.api_key = key;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("{:#}", e))?;
    output.success("Catalog API key saved");
    Ok(())
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    // Count and slice by chars; keys are arbitrary strings.
    let chars = key.chars().count();
    if chars <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(chars - 4).collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(""), "(not set)");
        assert_eq!(mask_key("ab"), "****");
        assert_eq!(mask_key("abcdef1234"), "****1234");
    }

    #[test]
    fn test_mask_key_multibyte() {
        assert_eq!(mask_key("éabc"), "****");
        assert_eq!(mask_key("clé-secrète"), "****rète");
    }
}

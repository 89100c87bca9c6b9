use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub bands: BandsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ChannelsConfig {
    #[serde(default = "default_brightness")]
    pub brightness: u16,
    #[serde(default = "default_red")]
    pub red: u16,
    #[serde(default = "default_green")]
    pub green: u16,
    #[serde(default = "default_blue")]
    pub blue: u16,
}

#[derive(Debug, Default, Deserialize)]
pub struct BandsConfig {
    pub red_max: Option<i64>,
    pub green_min: Option<i64>,
    pub green_max: Option<i64>,
    pub blue_min: Option<i64>,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            brightness: default_brightness(),
            red: default_red(),
            green: default_green(),
            blue: default_blue(),
        }
    }
}

fn default_brightness() -> u16 { 1 }
fn default_red() -> u16 { 2 }
fn default_green() -> u16 { 3 }
fn default_blue() -> u16 { 4 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.channels.brightness, 1);
        assert_eq!(cfg.channels.blue, 4);
        assert!(cfg.bands.red_max.is_none());
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg: Config = toml::from_str(
            "[channels]\nbrightness = 5\n\n[bands]\nred_max = 400\n",
        )
        .unwrap();
        assert_eq!(cfg.channels.brightness, 5);
        assert_eq!(cfg.channels.red, 2);
        assert_eq!(cfg.bands.red_max, Some(400));
        assert!(cfg.bands.green_min.is_none());
    }
}

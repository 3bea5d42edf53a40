use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_mindstack_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmSection,
    pub stack: StackSection,
    pub speech: SpeechSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    /// "auto" picks a provider from stored auth; or "anthropic" / "openai".
    pub provider: String,
    /// Empty string means the provider default.
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackSection {
    /// Visible window size.
    pub capacity: usize,
    /// How many active entries `show` and the board render.
    pub display_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSection {
    /// Recording length per session, seconds.
    pub record_seconds: u32,
    /// Whisper model name passed to the transcriber binary.
    pub whisper_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmSection {
                provider: "auto".to_string(),
                model: String::new(),
                temperature: 0.2,
            },
            stack: StackSection {
                capacity: mindstack_core::DEFAULT_CAPACITY,
                display_window: 6,
            },
            speech: SpeechSection {
                record_seconds: 6,
                whisper_model: "base".to_string(),
            },
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_mindstack_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

use anyhow::{format_err, Result};
use configparser::ini::Ini;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::{str::FromStr, time::Duration};

use crate::wallet::SendOptions;

/// Knobs used by the scanner and the closure executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReclaimSettings {
    pub commitment: CommitmentConfig,
    pub send_options: SendOptions,
    pub token_programs: Vec<Pubkey>,
}

impl Default for ReclaimSettings {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            send_options: SendOptions::default(),
            token_programs: vec![spl_token::id()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub http_url: String,
    pub payer_path: String,
    pub confirm_timeout: Duration,
    pub reclaim: ReclaimSettings,
}

const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;

pub fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|e| format_err!("failed to load {}: {}", client_config, e))?;
    parse_cfg(&config)
}

pub fn parse_cfg(config: &Ini) -> Result<ClientConfig> {
    let http_url = required(config, "Global", "http_url")?;
    let payer_path = required(config, "Global", "payer_path")?;

    let commitment = match config.get("Global", "commitment") {
        Some(level) if !level.is_empty() => CommitmentConfig::from_str(&level)
            .map_err(|_| format_err!("invalid commitment: {}", level))?,
        _ => CommitmentConfig::confirmed(),
    };

    let defaults = SendOptions::default();
    let max_retries = config
        .getuint("Reclaim", "max_retries")
        .map_err(|e| format_err!("max_retries: {}", e))?
        .map_or(defaults.max_retries, |v| v as usize);
    let skip_preflight = config
        .getbool("Reclaim", "skip_preflight")
        .map_err(|e| format_err!("skip_preflight: {}", e))?
        .unwrap_or(defaults.skip_preflight);
    let include_token_2022 = config
        .getbool("Reclaim", "include_token_2022")
        .map_err(|e| format_err!("include_token_2022: {}", e))?
        .unwrap_or(false);
    let confirm_timeout_secs = config
        .getuint("Reclaim", "confirm_timeout_secs")
        .map_err(|e| format_err!("confirm_timeout_secs: {}", e))?
        .unwrap_or(DEFAULT_CONFIRM_TIMEOUT_SECS);

    let mut token_programs = vec![spl_token::id()];
    if include_token_2022 {
        token_programs.push(spl_token_2022::id());
    }

    Ok(ClientConfig {
        http_url,
        payer_path,
        confirm_timeout: Duration::from_secs(confirm_timeout_secs),
        reclaim: ReclaimSettings {
            commitment,
            send_options: SendOptions {
                skip_preflight,
                preflight_commitment: commitment.commitment,
                max_retries,
            },
            token_programs,
        },
    })
}

fn required(config: &Ini, section: &str, key: &str) -> Result<String> {
    match config.get(section, key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format_err!("{} must not be empty", key)),
    }
}

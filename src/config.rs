// src/config.rs
use std::collections::HashMap;
use std::env;
use chrono::FixedOffset;
use std::net::SocketAddr;
use thiserror::Error;

use crate::domain::commission::DEFAULT_BROKERAGE_FEE_RATE;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealBackend {
    Sqlite,
    JsonFile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub db_path: String,
    pub schema_path: String,
    pub workers: usize,
    pub deal_backend: DealBackend,
    pub json_store_path: String,
    pub brokerage_fee_rate: f64,
    pub secure_cookies: bool,
    /// Offset of the agent's calendar day from UTC. Decides what "today" is.
    pub utc_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_map(&env::vars().collect())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_raw = get(vars, "CREST_BIND_ADDR", "127.0.0.1:3000");
        let bind_addr = bind_raw
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid("CREST_BIND_ADDR", &bind_raw, e))?;

        let workers_raw = get(vars, "CREST_WORKERS", "8");
        let workers: usize = workers_raw
            .parse()
            .map_err(|e: std::num::ParseIntError| invalid("CREST_WORKERS", &workers_raw, e))?;
        if workers == 0 {
            return Err(invalid("CREST_WORKERS", &workers_raw, "must be at least 1"));
        }

        let backend_raw = get(vars, "CREST_DEAL_STORE", "sqlite");
        let deal_backend = match backend_raw.to_ascii_lowercase().as_str() {
            "sqlite" => DealBackend::Sqlite,
            "json" => DealBackend::JsonFile,
            _ => return Err(invalid("CREST_DEAL_STORE", &backend_raw, "expected sqlite or json")),
        };

        let fee_raw = get(vars, "CREST_BROKERAGE_FEE_RATE", &DEFAULT_BROKERAGE_FEE_RATE.to_string());
        let brokerage_fee_rate: f64 = fee_raw
            .parse()
            .map_err(|e: std::num::ParseFloatError| invalid("CREST_BROKERAGE_FEE_RATE", &fee_raw, e))?;
        if !(0.0..=1.0).contains(&brokerage_fee_rate) {
            return Err(invalid(
                "CREST_BROKERAGE_FEE_RATE",
                &fee_raw,
                "must be a fraction between 0 and 1",
            ));
        }

        let secure_raw = get(vars, "CREST_SECURE_COOKIES", "false");
        let secure_cookies = match secure_raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => return Err(invalid("CREST_SECURE_COOKIES", &secure_raw, "expected true or false")),
        };

        let offset_raw = get(vars, "CREST_UTC_OFFSET", "+00:00");
        let utc_offset = parse_utc_offset(&offset_raw)
            .ok_or_else(|| invalid("CREST_UTC_OFFSET", &offset_raw, "expected +HH:MM or -HH:MM"))?;

        Ok(Self {
            bind_addr,
            db_path: get(vars, "CREST_DB_PATH", "crest.sqlite3"),
            schema_path: get(vars, "CREST_SCHEMA_PATH", "sql/schema.sql"),
            workers,
            deal_backend,
            json_store_path: get(vars, "CREST_JSON_STORE_PATH", "crest-pipeline-deals.json"),
            brokerage_fee_rate,
            secure_cookies,
            utc_offset,
        })
    }
}

fn get(vars: &HashMap<String, String>, key: &str, default: &str) -> String {
    vars.get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// `+HH:MM`, `-HH:MM` or `Z`.
fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (h, m) = rest.split_once(':')?;
    let (h, m): (i32, i32) = (h.parse().ok()?, m.parse().ok()?);
    if !(0..=23).contains(&h) || !(0..=59).contains(&m) {
        return None;
    }
    FixedOffset::east_opt(sign * (h * 3600 + m * 60))
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::from_map(&HashMap::new()).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.workers, 8);
        assert_eq!(cfg.deal_backend, DealBackend::Sqlite);
        assert_eq!(cfg.brokerage_fee_rate, 0.25);
        assert!(!cfg.secure_cookies);
        assert_eq!(cfg.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn utc_offset_parses_both_signs() {
        let cfg = AppConfig::from_map(&vars(&[("CREST_UTC_OFFSET", "-05:00")])).unwrap();
        assert_eq!(cfg.utc_offset.local_minus_utc(), -5 * 3600);

        let cfg = AppConfig::from_map(&vars(&[("CREST_UTC_OFFSET", "+05:30")])).unwrap();
        assert_eq!(cfg.utc_offset.local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn overrides() {
        let cfg = AppConfig::from_map(&vars(&[
            ("CREST_BIND_ADDR", "0.0.0.0:8080"),
            ("CREST_DEAL_STORE", "json"),
            ("CREST_BROKERAGE_FEE_RATE", "0"),
            ("CREST_WORKERS", "2"),
            ("CREST_SECURE_COOKIES", "true"),
        ]))
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.deal_backend, DealBackend::JsonFile);
        assert_eq!(cfg.brokerage_fee_rate, 0.0);
        assert_eq!(cfg.workers, 2);
        assert!(cfg.secure_cookies);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = AppConfig::from_map(&vars(&[("CREST_DB_PATH", "  ")])).unwrap();
        assert_eq!(cfg.db_path, "crest.sqlite3");
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            ("CREST_BIND_ADDR", "nowhere"),
            ("CREST_WORKERS", "0"),
            ("CREST_DEAL_STORE", "firestore"),
            ("CREST_BROKERAGE_FEE_RATE", "25"),
            ("CREST_SECURE_COOKIES", "maybe"),
            ("CREST_UTC_OFFSET", "EST"),
            ("CREST_UTC_OFFSET", "+25:00"),
        ] {
            match AppConfig::from_map(&vars(&[(key, value)])) {
                Err(ConfigError::Invalid { key: k, .. }) => assert_eq!(k, key),
                other => panic!("expected error for {key}, got {other:?}"),
            }
        }
    }
}

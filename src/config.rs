use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{configuration_error, Error};

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_STREAM_INTERVAL_SEC: u64 = 15;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Seeds the base random source; unset means OS entropy.
    pub seed: Option<u64>,
    pub stream_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            seed: None,
            stream_interval: Duration::from_secs(DEFAULT_STREAM_INTERVAL_SEC),
        }
    }
}

impl Config {
    /// Reads `OPTIRIDE_*` variables, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let defaults = Self::default();

        let interval_sec = parse_var(&lookup, "OPTIRIDE_STREAM_INTERVAL_SEC")?
            .unwrap_or(DEFAULT_STREAM_INTERVAL_SEC);
        if interval_sec == 0 {
            return Err(configuration_error("OPTIRIDE_STREAM_INTERVAL_SEC must be positive"));
        }

        Ok(Self {
            host: parse_var(&lookup, "OPTIRIDE_HOST")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "OPTIRIDE_PORT")?.unwrap_or(defaults.port),
            seed: parse_var(&lookup, "OPTIRIDE_SEED")?,
            stream_interval: Duration::from_secs(interval_sec),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    F: Fn(&str) -> Result<String, env::VarError>,
{
    match lookup(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| configuration_error(&format!("cannot parse {}={:?}", key, raw))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[test]
fn defaults_when_unset() {
    let config = Config::from_lookup(|_| Err(env::VarError::NotPresent)).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.addr(), "127.0.0.1:8081".parse().unwrap());
}

#[test]
fn reads_overrides() {
    let config = Config::from_lookup(|key| match key {
        "OPTIRIDE_HOST" => Ok("0.0.0.0".into()),
        "OPTIRIDE_PORT" => Ok("9000".into()),
        "OPTIRIDE_SEED" => Ok(" 1234 ".into()),
        "OPTIRIDE_STREAM_INTERVAL_SEC" => Ok("5".into()),
        _ => Err(env::VarError::NotPresent),
    })
    .unwrap();

    assert_eq!(config.addr(), "0.0.0.0:9000".parse().unwrap());
    assert_eq!(config.seed, Some(1234));
    assert_eq!(config.stream_interval, Duration::from_secs(5));
}

#[test]
fn rejects_bad_values() {
    let bad_port = Config::from_lookup(|key| match key {
        "OPTIRIDE_PORT" => Ok("eighty".into()),
        _ => Err(env::VarError::NotPresent),
    });
    assert_eq!(bad_port.unwrap_err().code, 2);

    let zero_interval = Config::from_lookup(|key| match key {
        "OPTIRIDE_STREAM_INTERVAL_SEC" => Ok("0".into()),
        _ => Err(env::VarError::NotPresent),
    });
    assert!(zero_interval.is_err());
}

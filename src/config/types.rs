use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum_macros::Display;

use crate::catalog::NameResolver;
use crate::config::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    pub station_name: String,
    pub station: StationConfig,
    pub satellites: Vec<SatelliteConfig>,
    /// Cron expression for orbital element refresh.
    pub tle_update: String,
    #[serde(rename = "rtlsdr")]
    pub radio: RadioConfig,
    /// Root for every capture and decoder output file.
    pub data_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SatelliteConfig {
    pub norad: u32,
    pub min_elevation: f32,
    pub priority: i32,
    pub downlinks: Vec<DownlinkConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownlinkConfig {
    pub name: String,
    pub frequency: u64,
    pub bandwidth: u64,
    pub enabled: bool,
    pub handler: String,
    pub output_format: String,
    pub modem: ModemType,
    pub sample_rate: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ModemType {
    Fm,
    Am,
    Bpsk,
    Qpsk,
    Oqpsk,
    Iq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioConfig {
    pub frequency: u64,
    pub sample_rate: u64,
    pub device_index: u32,
}

/// First-run template: one NOAA 15 APT downlink on an RTL-SDR.
pub fn default_config() -> ConfigData {
    ConfigData {
        station_name: "My Station".to_string(),
        station: StationConfig::default(),
        satellites: vec![SatelliteConfig {
            norad: 25338,
            min_elevation: 10.0,
            priority: 1,
            downlinks: vec![DownlinkConfig {
                name: "APT".to_string(),
                frequency: 137_620_000,
                bandwidth: 50_000,
                enabled: false,
                handler: "apt-noaa.lua".to_string(),
                output_format: "wav".to_string(),
                modem: ModemType::Fm,
                sample_rate: 11_025,
            }],
        }],
        tle_update: "0 0 * * *".to_string(),
        radio: RadioConfig {
            frequency: 137_500_000,
            sample_rate: 1_000_000,
            device_index: 0,
        },
        data_directory: PathBuf::from("data"),
    }
}

impl ConfigData {
    /// Returns the first satellite with a matching NORAD id.
    pub fn satellite(&self, norad: u32) -> Option<&SatelliteConfig> {
        self.satellites.iter().find(|s| s.norad == norad)
    }

    /// Sentinel form of [`ConfigData::satellite`]: a zero-valued config when absent.
    pub fn satellite_or_default(&self, norad: u32) -> SatelliteConfig {
        self.satellite(norad).cloned().unwrap_or_default()
    }

    /// Highest priority first; ties keep file order.
    pub fn satellites_by_priority(&self) -> Vec<&SatelliteConfig> {
        let mut sats: Vec<_> = self.satellites.iter().collect();
        sats.sort_by(|a, b| b.priority.cmp(&a.priority));
        sats
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(-90.0..=90.0).contains(&self.station.latitude) {
            return invalid(format!("latitude {} out of range", self.station.latitude));
        }
        if !(-180.0..=180.0).contains(&self.station.longitude) {
            return invalid(format!("longitude {} out of range", self.station.longitude));
        }
        if self.radio.frequency == 0 || self.radio.sample_rate == 0 {
            return invalid("rtlsdr frequency and sample_rate must be positive".into());
        }

        for sat in &self.satellites {
            if sat.norad == 0 {
                return invalid("satellite NORAD id must be positive".into());
            }
            for downlink in &sat.downlinks {
                if downlink.frequency == 0 || downlink.bandwidth == 0 {
                    return invalid(format!(
                        "satellite {} downlink {}: frequency and bandwidth must be positive",
                        sat.norad, downlink.name
                    ));
                }
                if downlink.sample_rate == 0 {
                    return invalid(format!(
                        "satellite {} downlink {}: sample_rate must be positive",
                        sat.norad, downlink.name
                    ));
                }
            }
        }

        Ok(())
    }
}

impl SatelliteConfig {
    /// Always asks the resolver; names follow catalog updates.
    pub fn name<R: NameResolver + ?Sized>(&self, resolver: &R) -> Option<String> {
        resolver.resolve_name(self.norad)
    }

    pub fn downlink(&self, name: &str) -> Option<&DownlinkConfig> {
        self.downlinks.iter().find(|d| d.name == name)
    }

    pub fn enabled_downlinks(&self) -> impl Iterator<Item = &DownlinkConfig> {
        self.downlinks.iter().filter(|d| d.enabled)
    }
}

// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::config::provisioner::ProvisionerConfig;
use crate::shared::error::{ProvisionError, Result};
use std::collections::HashMap;

/// Parse `-D key=value` properties into a map.
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let Some((key, value)) = config.split_once('=') else {
            return Err(ProvisionError::config_error(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            )));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(ProvisionError::config_error(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

pub fn apply_to_config(
    configs: &HashMap<String, String>,
    config: &mut ProvisionerConfig,
) -> Result<()> {
    for (key, value) in configs {
        match key.as_str() {
            "retry.period-ms" => {
                config.retry.period_ms = parse_number(key, value)?;
                config.retry.validate()?;
            }
            "retry.timeout-secs" => {
                config.retry.timeout_secs = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(parse_number(key, value)?)
                };
            }
            "render.output" => {
                config.render.output = value.parse()?;
            }
            "render.default-namespace" => {
                config.render.default_namespace = value.clone();
            }
            _ => {
                return Err(ProvisionError::config_error(format!(
                    "Unknown property: {}",
                    key
                )));
            }
        }
    }

    Ok(())
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.parse::<u64>().map_err(|e| {
        ProvisionError::config_error(format!("Invalid value '{}' for {}: {}", value, key, e))
    })
}

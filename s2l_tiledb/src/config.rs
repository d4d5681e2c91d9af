/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{fs, path::Path};
use serde::{Deserialize, Serialize};

use s2l_common::fs::EnvPathBuf;

use crate::errors::{Result, config_error};
use crate::geometry::DEFAULT_MAX_SEGMENT_DEG;

/// default file names of the grid tables within a grid directory
pub const WRS_TABLE_NAME: &str = "l8tiles.csv";
pub const MGRS_TABLE_NAME: &str = "s2tiles.csv";

/// where the grid tables live and how queries are resolved. Example RON config:
/// ```text
/// TileDbConfig(
///     wrs_table: "$S2L_GRID_DIR/l8tiles.csv",
///     mgrs_table: "$S2L_GRID_DIR/s2tiles.csv",
///     resolver: ( zone_window: 1, min_coverage: 0.0 ),
/// )
/// ```
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct TileDbConfig {
    pub wrs_table: EnvPathBuf,
    pub mgrs_table: EnvPathBuf,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl TileDbConfig {
    /// config for a directory that contains the grid tables under their default names
    pub fn from_dir (dir: impl AsRef<Path>) -> Result<TileDbConfig> {
        let dir = dir.as_ref();
        let wrs_table = EnvPathBuf::new( dir.join( WRS_TABLE_NAME)).map_err( |e| config_error(e))?;
        let mgrs_table = EnvPathBuf::new( dir.join( MGRS_TABLE_NAME)).map_err( |e| config_error(e))?;
        Ok( TileDbConfig { wrs_table, mgrs_table, resolver: ResolverConfig::default() })
    }

    pub fn validate (&self) -> Result<()> {
        self.resolver.validate()
    }
}

#[derive(Debug,Clone,Copy,Serialize,Deserialize,PartialEq)]
pub struct ResolverConfig {
    /// number of neighboring UTM zones searched on each side of the source zone
    #[serde(default="default_zone_window")]
    pub zone_window: u32,

    /// coverage fractions below this are dropped from results
    #[serde(default)]
    pub min_coverage: f64,

    #[serde(default="default_max_segment_deg")]
    pub max_segment_deg: f64,
}

fn default_zone_window () -> u32 { 1 }
fn default_max_segment_deg () -> f64 { DEFAULT_MAX_SEGMENT_DEG }

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            zone_window: default_zone_window(),
            min_coverage: 0.0,
            max_segment_deg: default_max_segment_deg(),
        }
    }
}

impl ResolverConfig {
    pub fn validate (&self) -> Result<()> {
        if self.zone_window > 30 {
            return Err( config_error( format!("zone_window out of range [0,30]: {}", self.zone_window)))
        }
        if !(0.0..=1.0).contains( &self.min_coverage) {
            return Err( config_error( format!("min_coverage out of range [0,1]: {}", self.min_coverage)))
        }
        if !(self.max_segment_deg > 0.0 && self.max_segment_deg.is_finite()) {
            return Err( config_error( format!("max_segment_deg has to be positive: {}", self.max_segment_deg)))
        }
        Ok(())
    }
}

pub fn parse_config (ron_src: &str) -> Result<TileDbConfig> {
    let config: TileDbConfig = ron::from_str( ron_src).map_err( |e| config_error( format!("{e}")))?;
    config.validate()?;
    Ok(config)
}

/// read and validate a RON config file
pub fn load_config (path: impl AsRef<Path>) -> Result<TileDbConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string( path).map_err( |e| config_error( format!("cannot read config {path:?}: {e}")))?;
    parse_config( &contents)
}

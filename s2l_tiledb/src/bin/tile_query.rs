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

use std::{fs, path::PathBuf};
use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use s2l_tiledb::{CrossGridMapper, TileDb, TileDbConfig, geometry, load_config};

/// query the MGRS / WRS-2 tile grids
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// RON config file with the grid table paths
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// directory with l8tiles.csv and s2tiles.csv (used if there is no --config)
    #[arg(short, long, env = "S2L_GRID_DIR")]
    grid_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// MGRS tiles overlapping a WRS path/row (e.g. 196_30)
    Wrs2mgrs { path_row: String },

    /// WRS path/rows overlapping an MGRS tile (e.g. 31TFJ)
    Mgrs2wrs {
        tile: String,
        #[arg(long)]
        same_utm: bool,
    },

    /// fraction of an MGRS tile covered by a WRS path/row
    Coverage {
        path_row: String,
        tile: String,
        #[arg(long)]
        same_utm: bool,
    },

    /// MGRS tiles for a WKT or GeoJSON ROI file
    Roi {
        file: PathBuf,
        /// only report tiles that contain the whole ROI
        #[arg(long)]
        within: bool,
    },

    /// WKT footprint of a tile code or path/row
    Wkt {
        id: String,
        /// UTM instead of lon/lat coordinates (MGRS only)
        #[arg(long)]
        utm: bool,
    },
}

fn main () -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env()) // use RUST_LOG to set max level
        .with_writer( std::io::stderr)
        .init();

    let args = Args::parse();

    let config = if let Some(path) = &args.config {
        load_config( path)?
    } else if let Some(dir) = &args.grid_dir {
        TileDbConfig::from_dir( dir)?
    } else {
        return Err( anyhow!("no grid tables given (use --config or --grid-dir)"))
    };

    let db = TileDb::open( &config)?;
    let mapper = CrossGridMapper::new( &db, &config.resolver);

    let output = match &args.cmd {
        Cmd::Wrs2mgrs { path_row } => {
            json!( mapper.wrs_to_mgrs( path_row)?)
        }
        Cmd::Mgrs2wrs { tile, same_utm } => {
            let results: Vec<_> = mapper.mgrs_to_wrs( tile, *same_utm)?.into_iter()
                .map( |(wrs,coverage)| json!([ wrs.as_array(), coverage ]))
                .collect();
            json!( results)
        }
        Cmd::Coverage { path_row, tile, same_utm } => {
            let wrs: s2l_tiledb::WrsId = path_row.parse()?;
            json!( mapper.get_coverage( (wrs.path, wrs.row), tile, *same_utm)?)
        }
        Cmd::Roi { file, within } => {
            let src = fs::read_to_string( file)?;
            let roi = if src.trim_start().starts_with('{') { geometry::parse_geojson( &src)? } else { geometry::parse_wkt( &src)? };
            let tiles = if *within { mapper.tiles_fully_containing_roi( &roi)? } else { mapper.tiles_contains_roi( &roi)? };
            json!( tiles)
        }
        Cmd::Wkt { id, utm } => {
            let wkt = if id.contains('_') { mapper.wrs_to_wkt( id)? } else { mapper.mgrs_to_wkt( id, *utm)? };
            json!( wkt)
        }
    };

    println!("{}", serde_json::to_string_pretty( &output)?);
    Ok(())
}

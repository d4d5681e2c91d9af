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

//! MGRS / WRS-2 tile grid resolution and coverage.
//!
//! A `TileDb` holds the Sentinel-2 MGRS and Landsat WRS-2 footprints. `CoverageResolver` computes ranked
//! coverage results for tiles or ROI polygons, and `CrossGridMapper` provides the path/row <-> tile code
//! queries on top of it:
//! ```no_run
//! use s2l_tiledb::{TileDb, CrossGridMapper, load_config};
//!
//! let config = load_config("tiledb.ron")?;
//! let db = TileDb::open( &config)?;
//! let mapper = CrossGridMapper::new( &db, &config.resolver);
//! for (wrs,coverage) in mapper.mgrs_to_wrs( "31TFJ", false)? {
//!     println!("{wrs}: {coverage:.3}");
//! }
//! # Ok::<(),s2l_tiledb::errors::TileDbError>(())
//! ```

pub mod errors;
pub mod tile_id;
pub mod geometry;
pub mod tables;
pub mod store;
pub mod config;
pub mod coverage;
pub mod mapper;

pub use errors::{Result, TileDbError};
pub use tile_id::{GridKind, MgrsCode, TileId, WrsId};
pub use geometry::{Crs, GeometryAdapter};
pub use tables::TableFormat;
pub use store::{Locality, TileDb, TileFootprint};
pub use config::{ResolverConfig, TileDbConfig, load_config};
pub use coverage::{CoverageResolver, CoverageResult, QueryOptions, Source};
pub use mapper::CrossGridMapper;

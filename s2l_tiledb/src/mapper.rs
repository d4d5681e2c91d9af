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

//! the query surface used by product readers and archive search: WRS <-> MGRS correspondences,
//! tile coverage, ROI to MGRS tile resolution and footprint export

use std::collections::BTreeSet;
use geo::MultiPolygon;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::coverage::{CoverageResolver, CoverageResult, QueryOptions, Source};
use crate::errors::{Result, geometry_error};
use crate::geometry::{parse_wkt, to_wkt};
use crate::store::TileDb;
use crate::tile_id::{GridKind, MgrsCode, TileId, WrsId};

#[derive(Clone)]
pub struct CrossGridMapper<'a> {
    resolver: CoverageResolver<'a>,
}

impl<'a> CrossGridMapper<'a> {
    pub fn new (db: &'a TileDb, config: &ResolverConfig) -> Self {
        CrossGridMapper { resolver: CoverageResolver::new( db, config) }
    }

    /// MGRS tiles overlapping a WRS path/row such as "196_30", most covered first
    pub fn wrs_to_mgrs (&self, path_row: &str) -> Result<Vec<String>> {
        let results = self.wrs_to_mgrs_coverage( path_row, false)?;
        Ok( results.into_iter().map( |r| r.tile.to_string()).collect())
    }

    pub fn wrs_to_mgrs_coverage (&self, path_row: &str, same_utm: bool) -> Result<Vec<CoverageResult>> {
        let id: WrsId = path_row.parse()?;
        self.resolver.resolve( &Source::Tile( TileId::Wrs(id)), GridKind::Mgrs, &QueryOptions::same_utm( same_utm))
    }

    /// WRS path/rows overlapping an MGRS tile with the fraction of the MGRS tile they cover
    pub fn mgrs_to_wrs (&self, mgrs_code: &str, same_utm: bool) -> Result<Vec<(WrsId,f64)>> {
        let code: MgrsCode = mgrs_code.parse()?;
        let results = self.resolver.resolve( &Source::Tile( TileId::Mgrs(code)), GridKind::Wrs, &QueryOptions::same_utm( same_utm))?;

        Ok( results.into_iter().filter_map( |r| r.tile.as_wrs().map( |id| (*id, r.coverage))).collect())
    }

    /// fraction of an MGRS tile covered by a WRS path/row. This is 0 if the tiles don't overlap,
    /// or if `same_utm` is set and they are in different UTM zones
    pub fn get_coverage (&self, path_row: (u16,u16), mgrs_code: &str, same_utm: bool) -> Result<f64> {
        let id = WrsId::try_from( path_row)?;
        let code: MgrsCode = mgrs_code.parse()?;

        let db = self.resolver.db();
        let wrs = db.get_wrs( &id)?;
        let mgrs = db.get_mgrs( &code)?;

        if same_utm && wrs.utm_zone() != mgrs.utm_zone() {
            debug!("{} (zone {}) and {} are in different UTM zones", id, wrs.utm_zone(), code);
            return Ok(0.0)
        }
        self.resolver.pair_coverage( wrs, mgrs)
    }

    /// MGRS tiles whose footprint fully or partially covers the ROI, i.e. the tiles needed to
    /// process the whole ROI
    pub fn tiles_contains_roi (&self, roi: &MultiPolygon) -> Result<BTreeSet<String>> {
        let results = self.roi_tiles( roi)?;
        debug!("{} MGRS tiles intersect ROI", results.len());
        Ok( results.into_iter().map( |r| r.tile.to_string()).collect())
    }

    /// same as `tiles_contains_roi`
    pub fn tiles_intersect_roi (&self, roi: &MultiPolygon) -> Result<BTreeSet<String>> {
        self.tiles_contains_roi( roi)
    }

    /// only the MGRS tiles that each contain the whole ROI. Empty if the ROI is not inside any single tile
    pub fn tiles_fully_containing_roi (&self, roi: &MultiPolygon) -> Result<BTreeSet<String>> {
        let results = self.roi_tiles( roi)?;
        Ok( results.into_iter().filter( |r| r.coverage >= 1.0).map( |r| r.tile.to_string()).collect())
    }

    pub fn tiles_contains_roi_wkt (&self, roi_wkt: &str) -> Result<BTreeSet<String>> {
        self.tiles_contains_roi( &parse_wkt( roi_wkt)?)
    }

    pub fn tiles_intersect_roi_wkt (&self, roi_wkt: &str) -> Result<BTreeSet<String>> {
        self.tiles_intersect_roi( &parse_wkt( roi_wkt)?)
    }

    pub fn tiles_fully_containing_roi_wkt (&self, roi_wkt: &str) -> Result<BTreeSet<String>> {
        self.tiles_fully_containing_roi( &parse_wkt( roi_wkt)?)
    }

    fn roi_tiles (&self, roi: &MultiPolygon) -> Result<Vec<CoverageResult>> {
        let opts = QueryOptions { same_utm_only: false, min_coverage: Some(0.0) };
        self.resolver.resolve( &Source::Polygon(roi), GridKind::Mgrs, &opts)
    }

    /// footprint of an MGRS tile as WKT, either lon/lat or in the tile's UTM zone
    pub fn mgrs_to_wkt (&self, mgrs_code: &str, utm: bool) -> Result<String> {
        let code: MgrsCode = mgrs_code.parse()?;
        let fp = self.resolver.db().get_mgrs( &code)?;
        if utm {
            fp.utm().map( to_wkt).ok_or_else( || geometry_error!("no UTM footprint for {}", code))
        } else {
            Ok( to_wkt( fp.geo()))
        }
    }

    /// lon/lat footprint of a WRS path/row as WKT
    pub fn wrs_to_wkt (&self, path_row: &str) -> Result<String> {
        let id: WrsId = path_row.parse()?;
        Ok( to_wkt( self.resolver.db().get_wrs( &id)?.geo()))
    }
}


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

//! resolving which tiles of a target grid overlap a source tile or ROI polygon, and by how much.
//!
//! Coverage fractions are always measured in a UTM frame. For tile pairs the reference footprint is
//! the MGRS tile and the frame is its own UTM zone, no matter which side the query starts from, so
//! that WRS->MGRS and MGRS->WRS report identical fractions. For ROI polygons the reference is the ROI,
//! measured in the zone of each candidate tile. ROIs that extend far beyond a candidate are clipped to
//! its surroundings and measured per zone strip, so that they never have to fit into a single zone

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use geo::{Area, MultiPolygon};
use serde::Serialize;
use tracing::debug;

use s2l_common::BoundingBox;
use s2l_common::geo::GeoPoint;
use s2l_common::utm::{UtmZone, utm_zone};

use crate::config::ResolverConfig;
use crate::errors::{Result, geometry_error};
use crate::geometry::{self, Crs, GeometryAdapter};
use crate::store::{Locality, TileDb, TileFootprint};
use crate::tile_id::{GridKind, TileId};

/// fractions this close to 1 are reported as full coverage
pub const FULL_COVERAGE_EPS: f64 = 1e-9;

/// margin in degrees around a candidate tile to which large ROIs are clipped before projection
pub const ROI_CLIP_MARGIN_DEG: f64 = 1.0;

/// what to resolve coverage for
#[derive(Debug,Clone)]
pub enum Source<'a> {
    /// a footprint of the grid store
    Tile(TileId),

    /// a geographic (EPSG:4326) polygon such as an ROI or a scene footprint
    Polygon(&'a MultiPolygon),
}

#[derive(Debug,Clone,Copy,Default)]
pub struct QueryOptions {
    /// drop candidates that are not in the UTM zone of the source
    pub same_utm_only: bool,

    /// overrides the configured minimum coverage
    pub min_coverage: Option<f64>,
}

impl QueryOptions {
    pub fn same_utm (same_utm_only: bool) -> Self {
        QueryOptions { same_utm_only, min_coverage: None }
    }
}

#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct CoverageResult {
    pub tile: TileId,
    pub coverage: f64,
    pub same_utm: bool,
}

/// clamp into [0,1] and snap values within `FULL_COVERAGE_EPS` of 1
pub fn coverage_fraction (intersection_area: f64, reference_area: f64) -> f64 {
    if !(reference_area > 0.0) || !intersection_area.is_finite() {
        return 0.0
    }
    let f = (intersection_area / reference_area).clamp( 0.0, 1.0);
    if f >= 1.0 - FULL_COVERAGE_EPS { 1.0 } else { f }
}

/// coverage descending, then same zone first, then identifier text
pub fn compare_results (a: &CoverageResult, b: &CoverageResult) -> Ordering {
    b.coverage.total_cmp( &a.coverage)
        .then_with( || b.same_utm.cmp( &a.same_utm))
        .then_with( || a.tile.to_string().cmp( &b.tile.to_string()))
}

pub fn rank (results: &mut [CoverageResult]) {
    results.sort_by( compare_results);
}

/// do two geographic boxes overlap, taking into account that either one can extend beyond +-180
fn geo_bbox_overlaps (a: &BoundingBox<f64>, b: &BoundingBox<f64>) -> bool {
    if a.south > b.north || b.south > a.north { return false }
    let b_ranges = b.lon_ranges();
    a.lon_ranges().iter().any( |(aw,ae)| b_ranges.iter().any( |(bw,be)| aw <= be && bw <= ae))
}

// source polygons projected into the UTM zones used during one query, and the metric area of
// large ROIs that don't fit into a single zone
#[derive(Default)]
struct ZoneCache {
    polygons: HashMap<UtmZone,MultiPolygon>,
    geographic_area: Option<f64>,
}

impl ZoneCache {
    fn get_or_project (&mut self, adapter: &GeometryAdapter, geo: &MultiPolygon, zone: UtmZone) -> Result<&MultiPolygon> {
        if !self.polygons.contains_key( &zone) {
            let projected = adapter.reproject( geo, Crs::Wgs84, Crs::Utm(zone))?;
            self.polygons.insert( zone, projected);
        }
        self.polygons.get( &zone).ok_or_else( || geometry_error!("no projection for zone {}", zone))
    }

    fn get_or_measure (&mut self, adapter: &GeometryAdapter, geo: &MultiPolygon) -> Result<f64> {
        match self.geographic_area {
            Some(area) => Ok(area),
            None => {
                let area = adapter.geographic_area( geo)?;
                self.geographic_area = Some(area);
                Ok(area)
            }
        }
    }
}

fn grow (bbox: &BoundingBox<f64>, margin: f64) -> BoundingBox<f64> {
    BoundingBox::new( bbox.west - margin, (bbox.south - margin).max(-90.0), bbox.east + margin, (bbox.north + margin).min(90.0))
}

// is `inner` within `outer`, with `outer` possibly shifted by one turn
fn bbox_within (inner: &BoundingBox<f64>, outer: &BoundingBox<f64>) -> bool {
    inner.south >= outer.south && inner.north <= outer.north &&
        [-360.0, 0.0, 360.0].iter().any( |off| inner.west >= outer.west + off && inner.east <= outer.east + off)
}

// the resolved source of a query
enum SourceGeom<'a> {
    Footprint(&'a TileFootprint),
    Roi { geo: MultiPolygon, bbox: BoundingBox<f64>, zone: u32 },
}

impl<'a> SourceGeom<'a> {
    fn bbox (&self) -> &BoundingBox<f64> {
        match self {
            SourceGeom::Footprint(fp) => fp.bbox(),
            SourceGeom::Roi{bbox,..} => bbox,
        }
    }

    fn utm_zone (&self) -> u32 {
        match self {
            SourceGeom::Footprint(fp) => fp.utm_zone(),
            SourceGeom::Roi{zone,..} => *zone,
        }
    }

    fn id (&self) -> Option<&TileId> {
        match self {
            SourceGeom::Footprint(fp) => Some( fp.id()),
            SourceGeom::Roi{..} => None,
        }
    }
}

/// computes ranked coverage results from a shared `TileDb`. Resolvers are cheap to create and
/// can be used concurrently from several threads
#[derive(Clone)]
pub struct CoverageResolver<'a> {
    db: &'a TileDb,
    geometry: GeometryAdapter,
    zone_window: u32,
    min_coverage: f64,
}

impl<'a> CoverageResolver<'a> {
    pub fn new (db: &'a TileDb, config: &ResolverConfig) -> Self {
        CoverageResolver {
            db,
            geometry: GeometryAdapter::new( config.max_segment_deg),
            zone_window: config.zone_window,
            min_coverage: config.min_coverage,
        }
    }

    pub fn db (&self) -> &'a TileDb { self.db }

    pub fn geometry (&self) -> &GeometryAdapter { &self.geometry }

    /// all tiles of the `target` grid that overlap `source`, best coverage first
    pub fn resolve (&self, source: &Source, target: GridKind, opts: &QueryOptions) -> Result<Vec<CoverageResult>> {
        let src = match source {
            Source::Tile(id) => SourceGeom::Footprint( self.db.get_footprint( id)?),
            Source::Polygon(mp) => {
                geometry::validate( mp)?;
                let geo = geometry::unwrap_longitudes( mp);
                let bbox = geometry::bbox( &geo).ok_or_else( || geometry_error!("empty ROI"))?;
                let (lon,lat) = geometry::centroid( &geo).unwrap_or( bbox.center());
                let zone = utm_zone( &GeoPoint::from_lon_lat_degrees( lon, lat));
                SourceGeom::Roi { geo, bbox, zone }
            }
        };
        let min_coverage = opts.min_coverage.unwrap_or( self.min_coverage);
        let src_zone = src.utm_zone();

        let localities = [
            Locality::Zones { center: src_zone, window: self.zone_window },
            Locality::BBox( *src.bbox()),
        ];
        let candidates = self.db.candidates_near_any( target, &localities);

        let mut cache = ZoneCache::default();
        let mut results: Vec<CoverageResult> = Vec::new();

        for cand in candidates {
            if Some(cand.id()) == src.id() { continue }

            let same_utm = cand.utm_zone() == src_zone;
            if opts.same_utm_only && !same_utm { continue }
            if !geo_bbox_overlaps( src.bbox(), cand.bbox()) { continue }

            let coverage = match &src {
                SourceGeom::Footprint(fp) => self.pair_coverage_cached( fp, cand, &mut cache)?,
                SourceGeom::Roi{geo,bbox,..} => self.roi_coverage_cached( geo, bbox, cand, &mut cache)?,
            };

            if coverage > 0.0 && coverage >= min_coverage {
                results.push( CoverageResult { tile: cand.id().clone(), coverage, same_utm });
            }
        }

        rank( &mut results);
        debug!("resolved {} {} tiles for source zone {}", results.len(), target, src_zone);
        Ok(results)
    }

    /// coverage of a tile pair, measured relative to the MGRS tile of the pair (or `source` if both are
    /// of the same grid) within the reference tile's UTM zone
    pub fn pair_coverage (&self, source: &TileFootprint, target: &TileFootprint) -> Result<f64> {
        self.pair_coverage_cached( source, target, &mut ZoneCache::default())
    }

    /// coverage of a tile by a geographic polygon, relative to the polygon area
    pub fn roi_coverage (&self, roi: &MultiPolygon, target: &TileFootprint) -> Result<f64> {
        geometry::validate( roi)?;
        let geo = geometry::unwrap_longitudes( roi);
        let bbox = geometry::bbox( &geo).ok_or_else( || geometry_error!("empty ROI"))?;
        self.roi_coverage_cached( &geo, &bbox, target, &mut ZoneCache::default())
    }

    fn pair_coverage_cached (&self, source: &TileFootprint, target: &TileFootprint, cache: &mut ZoneCache) -> Result<f64> {
        let target_is_reference = target.grid() == GridKind::Mgrs && source.grid() != GridKind::Mgrs;
        let (reference, other) = if target_is_reference { (target, source) } else { (source, target) };
        let zone = reference.metric_zone();

        let ref_metric = self.metric_polygon( reference, zone)?;
        let other_metric: Cow<MultiPolygon> = if target_is_reference {
            // the source is projected into each candidate's zone, which repeats within a query
            Cow::Borrowed( cache.get_or_project( &self.geometry, source.geo(), zone)?)
        } else {
            self.metric_polygon( other, zone)?
        };

        let inter = geometry::intersect( &ref_metric, &other_metric);
        Ok( coverage_fraction( inter.unsigned_area(), ref_metric.unsigned_area()))
    }

    // ROIs close to the target are measured as a whole in the target zone. Larger ones are clipped to the
    // target surroundings first, and their area is measured per zone strip
    fn roi_coverage_cached (&self, roi: &MultiPolygon, roi_bbox: &BoundingBox<f64>, target: &TileFootprint, cache: &mut ZoneCache) -> Result<f64> {
        let zone = target.metric_zone();
        let clip = grow( target.bbox(), ROI_CLIP_MARGIN_DEG);

        if bbox_within( roi_bbox, &clip) {
            let target_metric = self.metric_polygon( target, zone)?;
            let roi_metric = cache.get_or_project( &self.geometry, roi, zone)?;

            let inter = geometry::intersect( roi_metric, &target_metric);
            Ok( coverage_fraction( inter.unsigned_area(), roi_metric.unsigned_area()))

        } else {
            let clipped = geometry::clip_to_bbox( roi, &clip);
            if clipped.0.is_empty() { return Ok(0.0) }

            let target_metric = self.metric_polygon( target, zone)?;
            let clipped_metric = self.geometry.reproject( &clipped, Crs::Wgs84, Crs::Utm(zone))?;
            let inter = geometry::intersect( &clipped_metric, &target_metric);
            if inter.0.is_empty() { return Ok(0.0) }

            let roi_area = cache.get_or_measure( &self.geometry, roi)?;
            Ok( coverage_fraction( inter.unsigned_area(), roi_area))
        }
    }

    /// the footprint in the given UTM zone. MGRS tiles in their own zone use their stored UTM polygon
    fn metric_polygon<'f> (&self, fp: &'f TileFootprint, zone: UtmZone) -> Result<Cow<'f,MultiPolygon>> {
        if fp.grid() == GridKind::Mgrs && fp.metric_zone() == zone {
            if let Some(utm) = fp.utm() {
                return Ok( Cow::Borrowed(utm))
            }
        }
        Ok( Cow::Owned( self.geometry.reproject( fp.geo(), Crs::Wgs84, Crs::Utm(zone))?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_id::WrsId;

    fn result (id: &str, coverage: f64, same_utm: bool) -> CoverageResult {
        let tile = if id.contains('_') {
            TileId::Wrs( id.parse::<WrsId>().unwrap())
        } else {
            TileId::Mgrs( id.parse().unwrap())
        };
        CoverageResult { tile, coverage, same_utm }
    }

    #[test]
    fn test_coverage_fraction () {
        assert_eq!( coverage_fraction( 5.0, 10.0), 0.5);
        assert_eq!( coverage_fraction( 10.0 + 1e-6, 10.0), 1.0);
        assert_eq!( coverage_fraction( 10.0 - 1e-12, 10.0), 1.0);
        assert_eq!( coverage_fraction( 1.0, 0.0), 0.0);
        assert_eq!( coverage_fraction( -1.0, 10.0), 0.0);
    }

    #[test]
    fn test_rank () {
        let mut results = vec![
            result( "31TGJ", 0.5, false),
            result( "31TFK", 0.5, true),
            result( "31TEJ", 0.5, true),
            result( "31TFJ", 0.9, false),
        ];
        rank( &mut results);
        let ids: Vec<String> = results.iter().map( |r| r.tile.to_string()).collect();
        assert_eq!( ids, vec!["31TFJ", "31TEJ", "31TFK", "31TGJ"]);
    }

    #[test]
    fn test_bbox_within () {
        let clip = grow( &BoundingBox::new( -178.8, 59.5, -176.8, 60.5), 1.0);
        assert!( bbox_within( &BoundingBox::new( -179.0, 60.0, -178.0, 60.2), &clip));
        assert!( bbox_within( &BoundingBox::new( 180.5, 60.0, 181.5, 60.2), &clip));
        assert!( !bbox_within( &BoundingBox::new( 178.5, 60.0, 182.0, 60.2), &clip));
        assert_eq!( grow( &BoundingBox::new( 0.0, 89.5, 1.0, 90.0), 1.0).north, 90.0);
    }

    #[test]
    fn test_bbox_overlap () {
        let a = BoundingBox::new( 179.0, 10.0, 181.0, 11.0);
        let b = BoundingBox::new( -180.0, 10.5, -179.5, 12.0);
        let c = BoundingBox::new( 170.0, 10.5, 175.0, 12.0);
        assert!( geo_bbox_overlaps( &a, &b));
        assert!( geo_bbox_overlaps( &b, &a));
        assert!( !geo_bbox_overlaps( &a, &c));
    }
}

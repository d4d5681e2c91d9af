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

//! the spatial grid store: WRS-2 and MGRS footprints loaded once at startup, looked up by identifier,
//! by UTM zone window or by geographic envelope. The store is immutable after loading and can be shared
//! between query threads

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use geo::MultiPolygon;
use rstar::{RTree, RTreeObject, AABB};
use tracing::{debug, info};

use s2l_common::BoundingBox;
use s2l_common::fs::existing_file;
use s2l_common::utm::UtmZone;

use crate::config::TileDbConfig;
use crate::errors::{Result, invalid_record, not_found, projection_error, geometry_error, storage_unavailable};
use crate::geometry::{bbox, unwrap_longitudes};
use crate::tables::{load_mgrs_table, load_wrs_table};
use crate::tile_id::{GridKind, MgrsCode, TileId, WrsId};

/* #region TileFootprint ***********************************************************************************/

/// the immutable footprint of a single grid tile. Geographic polygons are stored with continuous
/// longitudes, i.e. antimeridian crossing footprints can have longitudes beyond +-180
#[derive(Debug,Clone)]
pub struct TileFootprint {
    id: TileId,
    geo: MultiPolygon,
    utm_zone: u32,
    epsg_zone: Option<UtmZone>, // MGRS only
    utm: Option<MultiPolygon>,  // MGRS only
    bbox: BoundingBox<f64>,
}

impl TileFootprint {
    pub fn wrs (id: WrsId, utm_zone: u32, geo: MultiPolygon) -> Result<TileFootprint> {
        if utm_zone < 1 || utm_zone > 60 {
            return Err( projection_error!("invalid UTM zone {} for WRS tile {}", utm_zone, id))
        }
        let geo = unwrap_longitudes( &geo);
        let bbox = bbox( &geo).ok_or_else( || geometry_error!("empty footprint for {}", id))?;

        Ok( TileFootprint { id: TileId::Wrs(id), geo, utm_zone, epsg_zone: None, utm: None, bbox })
    }

    pub fn mgrs (code: MgrsCode, epsg: u32, geo: MultiPolygon, utm: MultiPolygon) -> Result<TileFootprint> {
        let zone = UtmZone::from_epsg( epsg).ok_or_else( || projection_error!("unsupported EPSG {} for MGRS tile {}", epsg, code))?;
        if zone.zone != code.zone() {
            return Err( projection_error!("EPSG {} does not match zone of MGRS tile {}", epsg, code))
        }
        let geo = unwrap_longitudes( &geo);
        let bbox = bbox( &geo).ok_or_else( || geometry_error!("empty footprint for {}", code))?;

        Ok( TileFootprint { id: TileId::Mgrs(code), geo, utm_zone: zone.zone, epsg_zone: Some(zone), utm: Some(utm), bbox })
    }

    pub fn id (&self) -> &TileId { &self.id }
    pub fn grid (&self) -> GridKind { self.id.grid() }

    /// lon/lat polygon (EPSG:4326)
    pub fn geo (&self) -> &MultiPolygon { &self.geo }

    pub fn utm_zone (&self) -> u32 { self.utm_zone }

    /// projected polygon in the tile's own UTM zone, only available for MGRS tiles
    pub fn utm (&self) -> Option<&MultiPolygon> { self.utm.as_ref() }

    pub fn epsg (&self) -> Option<u32> { self.epsg_zone.map( |z| z.epsg()) }

    /// the UTM zone used to measure this tile: the EPSG zone for MGRS tiles, and the WRS zone column
    /// with the hemisphere of the footprint center for WRS tiles
    pub fn metric_zone (&self) -> UtmZone {
        match self.epsg_zone {
            Some(zone) => zone,
            None => UtmZone { zone: self.utm_zone, north: self.bbox.center().1 >= 0.0 }
        }
    }

    pub fn bbox (&self) -> &BoundingBox<f64> { &self.bbox }
}

/* #endregion TileFootprint */

/// where to look for candidate tiles
#[derive(Debug,Clone,Copy,PartialEq)]
pub enum Locality {
    /// all tiles within `window` zones of `center`, wrapping around between zones 60 and 1
    Zones { center: u32, window: u32 },

    /// all tiles whose geographic envelope intersects the box. The box can extend beyond +-180
    BBox(BoundingBox<f64>),
}

/// circular distance of two UTM zone numbers
pub fn zone_distance (a: u32, b: u32) -> u32 {
    let d = a.abs_diff(b) % 60;
    d.min( 60 - d)
}

// R-tree entry. Footprints that extend beyond the antimeridian get one entry per side
#[derive(Debug,Clone)]
struct IndexedEnvelope {
    idx: usize,
    envelope: AABB<[f64;2]>,
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64;2]>;

    fn envelope (&self) -> Self::Envelope { self.envelope }
}

fn envelopes (bbox: &BoundingBox<f64>) -> Vec<AABB<[f64;2]>> {
    bbox.lon_ranges().into_iter()
        .map( |(w,e)| AABB::from_corners( [w, bbox.south], [e, bbox.north]))
        .collect()
}

/* #region GridIndex **************************************************************************************/

/// all footprints of one grid with their id, zone and envelope indices
struct GridIndex {
    tiles: Vec<TileFootprint>,
    by_id: HashMap<TileId,usize>,
    by_zone: BTreeMap<u32,Vec<usize>>,
    rtree: RTree<IndexedEnvelope>,
}

impl GridIndex {
    fn new (grid: GridKind, tiles: Vec<TileFootprint>) -> Result<GridIndex> {
        let table = grid.to_string();
        let mut by_id: HashMap<TileId,usize> = HashMap::with_capacity( tiles.len());
        let mut by_zone: BTreeMap<u32,Vec<usize>> = BTreeMap::new();
        let mut entries: Vec<IndexedEnvelope> = Vec::with_capacity( tiles.len());

        for (idx,tile) in tiles.iter().enumerate() {
            if tile.grid() != grid {
                return Err( invalid_record( &table, format!("{} is not a {} tile", tile.id, grid)))
            }
            if by_id.insert( tile.id.clone(), idx).is_some() {
                return Err( invalid_record( &table, format!("duplicate tile id {}", tile.id)))
            }
            by_zone.entry( tile.utm_zone).or_default().push( idx);
            for envelope in envelopes( &tile.bbox) {
                entries.push( IndexedEnvelope { idx, envelope });
            }
        }

        let rtree = RTree::bulk_load( entries);
        Ok( GridIndex { tiles, by_id, by_zone, rtree })
    }

    fn collect_indices (&self, locality: &Locality, indices: &mut BTreeSet<usize>) {
        match locality {
            Locality::Zones { center, window } => {
                for (zone, zone_tiles) in &self.by_zone {
                    if zone_distance( *zone, *center) <= *window {
                        indices.extend( zone_tiles.iter().copied());
                    }
                }
            }
            Locality::BBox(bbox) => {
                for envelope in envelopes( bbox) {
                    indices.extend( self.rtree.locate_in_envelope_intersecting( &envelope).map( |e| e.idx));
                }
            }
        }
    }
}

/* #endregion GridIndex */

/// the read-only store of both grids
pub struct TileDb {
    wrs: GridIndex,
    mgrs: GridIndex,
}

// we don't want to dump thousands of footprints
impl fmt::Debug for TileDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileDb")
            .field("wrs", &self.wrs.tiles.len())
            .field("mgrs", &self.mgrs.tiles.len())
            .finish()
    }
}

impl TileDb {
    /// load both grid tables. Missing or unreadable tables are reported as `StorageUnavailable`,
    /// malformed rows or duplicate ids as `InvalidRecord`
    pub fn open (config: &TileDbConfig) -> Result<TileDb> {
        let wrs_path = existing_file( &config.wrs_table).map_err( |e| storage_unavailable( format!("WRS table: {e}")))?;
        let mgrs_path = existing_file( &config.mgrs_table).map_err( |e| storage_unavailable( format!("MGRS table: {e}")))?;

        let wrs = load_wrs_table( &wrs_path)?;
        let mgrs = load_mgrs_table( &mgrs_path)?;

        let db = TileDb::from_footprints( wrs, mgrs)?;
        info!("opened tile db with {} WRS and {} MGRS tiles", db.len(GridKind::Wrs), db.len(GridKind::Mgrs));
        Ok(db)
    }

    pub fn from_footprints (wrs: Vec<TileFootprint>, mgrs: Vec<TileFootprint>) -> Result<TileDb> {
        let wrs = GridIndex::new( GridKind::Wrs, wrs)?;
        let mgrs = GridIndex::new( GridKind::Mgrs, mgrs)?;
        Ok( TileDb { wrs, mgrs })
    }

    fn index (&self, grid: GridKind) -> &GridIndex {
        match grid {
            GridKind::Wrs => &self.wrs,
            GridKind::Mgrs => &self.mgrs,
        }
    }

    pub fn len (&self, grid: GridKind) -> usize { self.index(grid).tiles.len() }

    pub fn is_empty (&self) -> bool { self.wrs.tiles.is_empty() && self.mgrs.tiles.is_empty() }

    /// all footprints of a grid in table order
    pub fn tiles (&self, grid: GridKind) -> &[TileFootprint] { &self.index(grid).tiles }

    pub fn get_footprint (&self, id: &TileId) -> Result<&TileFootprint> {
        let index = self.index( id.grid());
        index.by_id.get( id).map( |idx| &index.tiles[*idx]).ok_or_else( || not_found( id))
    }

    pub fn get_wrs (&self, id: &WrsId) -> Result<&TileFootprint> {
        self.get_footprint( &TileId::Wrs(*id))
    }

    pub fn get_mgrs (&self, code: &MgrsCode) -> Result<&TileFootprint> {
        self.get_footprint( &TileId::Mgrs(code.clone()))
    }

    /// footprints of `grid` near a locality, in table order. Bounding box queries are conservative:
    /// they can return tiles that do not intersect, but never miss one that does
    pub fn candidates_near (&self, grid: GridKind, locality: &Locality) -> Vec<&TileFootprint> {
        self.candidates_near_any( grid, std::slice::from_ref(locality))
    }

    /// union of the candidates of several localities, each tile reported once
    pub fn candidates_near_any (&self, grid: GridKind, localities: &[Locality]) -> Vec<&TileFootprint> {
        let index = self.index( grid);
        let mut indices: BTreeSet<usize> = BTreeSet::new();
        for locality in localities {
            index.collect_indices( locality, &mut indices);
        }
        debug!("{} {} candidates for {:?}", indices.len(), grid, localities);
        indices.into_iter().map( |idx| &index.tiles[idx]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_distance () {
        assert_eq!( zone_distance( 31, 32), 1);
        assert_eq!( zone_distance( 60, 1), 1);
        assert_eq!( zone_distance( 1, 59), 2);
        assert_eq!( zone_distance( 10, 40), 30);
        assert_eq!( zone_distance( 5, 5), 0);
    }

    #[test]
    fn test_debug () {
        let res = TileDb::from_footprints( vec![], vec![]);
        assert_eq!( format!("{res:?}"), "Ok(TileDb { wrs: 0, mgrs: 0 })");
    }

    #[test]
    fn test_envelopes () {
        let bb = BoundingBox::new( 179.0, 10.0, 181.0, 11.0);
        let envs = envelopes( &bb);
        assert_eq!( envs.len(), 2);
        assert_eq!( envs[0], AABB::from_corners( [179.0, 10.0], [180.0, 11.0]));
        assert_eq!( envs[1], AABB::from_corners( [-180.0, 10.0], [-179.0, 11.0]));
    }
}

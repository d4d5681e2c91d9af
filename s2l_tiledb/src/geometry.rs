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

//! polygon support for tile footprints and ROIs: parsing, validation, intersection, metric area and
//! reprojection between EPSG:4326 and the WGS84 UTM zones. All functions return new geometries

use std::fmt;
use geo::{Area, BooleanOps, Coord, CoordsIter, LineString, MultiPolygon, Polygon, Validation};
use geo_types::Geometry;
use geojson::GeoJson;
use wkt::{ToWkt, TryFromWkt};

use s2l_common::BoundingBox;
use s2l_common::angle::{spans_antimeridian, unwrap_lon};
use s2l_common::utm::{UtmZone, lon_lat_to_utm, utm_to_lon_lat};

use crate::errors::{Result, geometry_error, projection_error};

pub const EPSG_WGS84: u32 = 4326;

/// default max length of geographic edges before they get densified for projection
pub const DEFAULT_MAX_SEGMENT_DEG: f64 = 0.1;

// approximate meters per degree on the equator, used to scale densification of projected edges
const M_PER_DEG: f64 = 111_320.0;

// longitude width of a UTM zone
const ZONE_WIDTH: f64 = 6.0;

/* #region Crs *********************************************************************************************/

/// the coordinate reference systems used by the grid tables
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum Crs {
    Wgs84,
    Utm(UtmZone),
}

impl Crs {
    pub fn from_epsg (epsg: u32) -> Result<Crs> {
        match epsg {
            EPSG_WGS84 => Ok(Crs::Wgs84),
            _ => UtmZone::from_epsg(epsg).map( Crs::Utm).ok_or_else( || projection_error!("unsupported EPSG code {}", epsg))
        }
    }

    /// accepts "EPSG:32631", "epsg:4326", "32631" or "WGS84"
    pub fn from_srs_spec (srs: &str) -> Result<Crs> {
        let srs = srs.trim();
        if let Some(code) = srs.strip_prefix("EPSG:").or_else( || srs.strip_prefix("epsg:")) {
            if let Ok(epsg) = code.parse::<u32>() {
                return Self::from_epsg( epsg)
            }
        } else if let Ok(epsg) = srs.parse::<u32>() {
            return Self::from_epsg( epsg)
        } else if srs.eq_ignore_ascii_case("WGS84") {
            return Ok(Crs::Wgs84)
        }
        Err( projection_error!("unsupported SRS spec '{}'", srs))
    }

    pub fn epsg (&self) -> u32 {
        match self {
            Crs::Wgs84 => EPSG_WGS84,
            Crs::Utm(zone) => zone.epsg()
        }
    }

    pub fn utm_zone (&self) -> Option<UtmZone> {
        if let Crs::Utm(zone) = self { Some(*zone) } else { None }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/* #endregion Crs */

/* #region parsing and validation *************************************************************************/

/// parse WKT POLYGON or MULTIPOLYGON text. Geographic input is not unwrapped here
pub fn parse_wkt (s: &str) -> Result<MultiPolygon> {
    let geom = Geometry::<f64>::try_from_wkt_str( s.trim()).map_err( |e| geometry_error!("malformed WKT: {}", e))?;
    let mp = match geom {
        Geometry::Polygon(p) => MultiPolygon::new( vec![p]),
        Geometry::MultiPolygon(mp) => mp,
        other => return Err( geometry_error!("not an areal geometry: {}", geometry_kind(&other)))
    };
    validate( &mp)?;
    Ok(mp)
}

/// collect all polygonal geometries of a GeoJSON geometry, feature or feature collection
pub fn parse_geojson (s: &str) -> Result<MultiPolygon> {
    let gj: GeoJson = s.parse().map_err( |e| geometry_error!("malformed GeoJSON: {}", e))?;
    let collection = geo_types::GeometryCollection::<f64>::try_from( &gj).map_err( |e| geometry_error!("unsupported GeoJSON: {}", e))?;

    let mut polygons: Vec<Polygon> = Vec::new();
    for g in collection.0.into_iter() {
        collect_polygons( g, &mut polygons);
    }
    if polygons.is_empty() {
        return Err( geometry_error!("GeoJSON does not contain polygons"))
    }

    let mp = MultiPolygon::new( polygons);
    validate( &mp)?;
    Ok(mp)
}

fn collect_polygons (geom: Geometry, polygons: &mut Vec<Polygon>) {
    match geom {
        Geometry::Polygon(p) => polygons.push(p),
        Geometry::MultiPolygon(mp) => polygons.extend( mp.0),
        Geometry::GeometryCollection(gc) => for g in gc.0 { collect_polygons( g, polygons) },
        _ => {} // non-areal parts don't contribute to coverage
    }
}

fn geometry_kind (geom: &Geometry) -> &'static str {
    match geom {
        Geometry::Point(_) => "POINT",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
    }
}

pub fn to_wkt (mp: &MultiPolygon) -> String {
    mp.wkt_string()
}

/// reject empty, non-finite, degenerate or self-intersecting polygons
pub fn validate (mp: &MultiPolygon) -> Result<()> {
    if mp.0.is_empty() {
        return Err( geometry_error!("empty polygon"))
    }
    if mp.coords_iter().any( |c| !(c.x.is_finite() && c.y.is_finite())) {
        return Err( geometry_error!("non-finite coordinates"))
    }
    for p in &mp.0 {
        if p.exterior().0.len() < 4 {
            return Err( geometry_error!("polygon exterior has less than 3 vertices"))
        }
    }
    if !mp.is_valid() {
        return Err( geometry_error!("invalid (self-intersecting or degenerate) polygon"))
    }
    if mp.unsigned_area() == 0.0 {
        return Err( geometry_error!("polygon has no area"))
    }
    Ok(())
}

/* #endregion parsing and validation */

/* #region geographic helpers ******************************************************************************/

/// make longitudes of a geographic polygon continuous if it crosses the antimeridian, i.e. shift
/// western hemisphere longitudes by +360. Non-crossing polygons are returned unchanged
pub fn unwrap_longitudes (mp: &MultiPolygon) -> MultiPolygon {
    if spans_antimeridian( mp.coords_iter().map( |c| c.x)) {
        map_coords_infallible( mp, |c| Coord{ x: unwrap_lon( c.x), y: c.y })
    } else {
        mp.clone()
    }
}

/// lon/lat (or easting/northing) envelope
pub fn bbox (mp: &MultiPolygon) -> Option<BoundingBox<f64>> {
    BoundingBox::from_coords( mp.coords_iter().map( |c| (c.x, c.y)))
}

pub fn centroid (mp: &MultiPolygon) -> Option<(f64,f64)> {
    use geo::Centroid;
    mp.centroid().map( |p| (p.x(), p.y()))
}

/// insert vertices so that no ring segment is longer than `max_len` (in coordinate units)
pub fn densify (mp: &MultiPolygon, max_len: f64) -> MultiPolygon {
    if !(max_len > 0.0) { return mp.clone() }

    let densify_ring = |ring: &LineString| -> LineString {
        let mut coords: Vec<Coord> = Vec::with_capacity( ring.0.len());
        for seg in ring.0.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            coords.push(a);
            let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
            let n = (len / max_len).ceil() as usize;
            for i in 1..n {
                let t = i as f64 / n as f64;
                coords.push( Coord{ x: a.x + t*(b.x - a.x), y: a.y + t*(b.y - a.y) });
            }
        }
        if let Some(last) = ring.0.last() { coords.push(*last) }
        LineString::new( coords)
    };

    MultiPolygon::new( mp.0.iter().map( |p| {
        Polygon::new( densify_ring( p.exterior()), p.interiors().iter().map( |r| densify_ring(r)).collect())
    }).collect())
}

pub fn intersect (a: &MultiPolygon, b: &MultiPolygon) -> MultiPolygon {
    a.intersection( b)
}

pub fn lon_lat_rect (west: f64, south: f64, east: f64, north: f64) -> MultiPolygon {
    let ring = LineString::from( vec![ (west,south), (east,south), (east,north), (west,north), (west,south) ]);
    MultiPolygon::new( vec![ Polygon::new( ring, vec![]) ])
}

/// the parts of a geographic polygon inside `clip`. Either one can have longitudes beyond +-180,
/// the box is also applied shifted by one turn to catch parts on the other side of the antimeridian
pub fn clip_to_bbox (mp: &MultiPolygon, clip: &BoundingBox<f64>) -> MultiPolygon {
    let Some(mp_bbox) = bbox( mp) else { return MultiPolygon::new( vec![]) };

    let mut polygons: Vec<Polygon> = Vec::new();
    for offset in [-360.0, 0.0, 360.0] {
        let (west, east) = (clip.west + offset, clip.east + offset);
        if west <= mp_bbox.east && east >= mp_bbox.west && clip.south <= mp_bbox.north && clip.north >= mp_bbox.south {
            let rect = lon_lat_rect( west, clip.south, east, clip.north);
            polygons.extend( intersect( mp, &rect).0);
        }
    }
    MultiPolygon::new( polygons)
}

fn map_coords_infallible<F> (mp: &MultiPolygon, f: F) -> MultiPolygon where F: Fn(Coord)->Coord {
    let map_ring = |ring: &LineString| LineString::new( ring.0.iter().map( |c| f(*c)).collect());
    MultiPolygon::new( mp.0.iter().map( |p| {
        Polygon::new( map_ring( p.exterior()), p.interiors().iter().map( |r| map_ring(r)).collect())
    }).collect())
}

fn try_map_coords<F> (mp: &MultiPolygon, f: F) -> Result<MultiPolygon> where F: Fn(Coord)->Result<Coord> {
    let map_ring = |ring: &LineString| -> Result<LineString> {
        let coords: Result<Vec<Coord>> = ring.0.iter().map( |c| f(*c)).collect();
        Ok( LineString::new( coords?))
    };

    let mut polygons = Vec::with_capacity( mp.0.len());
    for p in &mp.0 {
        let exterior = map_ring( p.exterior())?;
        let interiors: Result<Vec<LineString>> = p.interiors().iter().map( |r| map_ring(r)).collect();
        polygons.push( Polygon::new( exterior, interiors?));
    }
    Ok( MultiPolygon::new( polygons))
}

/* #endregion geographic helpers */

/// projection and area computation with a configurable densification of edges
#[derive(Debug,Clone,Copy)]
pub struct GeometryAdapter {
    pub max_segment_deg: f64,
}

impl Default for GeometryAdapter {
    fn default() -> Self {
        GeometryAdapter { max_segment_deg: DEFAULT_MAX_SEGMENT_DEG }
    }
}

impl GeometryAdapter {
    pub fn new (max_segment_deg: f64) -> Self {
        GeometryAdapter { max_segment_deg }
    }

    /// transform `mp` from one CRS into another. Edges are densified in the source CRS so that
    /// straight geographic (or projected) lines stay close to their original shape
    pub fn reproject (&self, mp: &MultiPolygon, from: Crs, to: Crs) -> Result<MultiPolygon> {
        if from == to { return Ok( mp.clone()) }

        match (from, to) {
            (Crs::Wgs84, Crs::Utm(zone)) => {
                let dense = densify( mp, self.max_segment_deg);
                try_map_coords( &dense, |c| {
                    lon_lat_to_utm( c.x, c.y, zone)
                        .map( |utm| Coord{ x: utm.easting, y: utm.northing })
                        .ok_or_else( || projection_error!("({},{}) can't be projected into UTM zone {}", c.x, c.y, zone))
                })
            }
            (Crs::Utm(zone), Crs::Wgs84) => {
                let dense = densify( mp, self.max_segment_deg * M_PER_DEG);
                try_map_coords( &dense, |c| utm_to_geo_coord( c, zone))
            }
            (Crs::Utm(from_zone), Crs::Utm(to_zone)) => {
                let dense = densify( mp, self.max_segment_deg * M_PER_DEG);
                try_map_coords( &dense, |c| {
                    let geo = utm_to_geo_coord( c, from_zone)?;
                    lon_lat_to_utm( geo.x, geo.y, to_zone)
                        .map( |utm| Coord{ x: utm.easting, y: utm.northing })
                        .ok_or_else( || projection_error!("({},{}) can't be projected from {} into {}", c.x, c.y, from_zone, to_zone))
                })
            }
            (Crs::Wgs84, Crs::Wgs84) => Ok( mp.clone()),
        }
    }

    /// area in square meters within the metric frame of `metric_zone`. Polygons already in that
    /// zone are measured as they are
    pub fn area (&self, mp: &MultiPolygon, crs: Crs, metric_zone: UtmZone) -> Result<f64> {
        let projected = self.reproject( mp, crs, Crs::Utm(metric_zone))?;
        Ok( projected.unsigned_area())
    }

    /// area in square meters of a geographic polygon of any extent. The polygon is cut into 6deg zone
    /// strips and each part is measured in its own zone
    pub fn geographic_area (&self, mp: &MultiPolygon) -> Result<f64> {
        let Some(bb) = bbox( mp) else { return Ok(0.0) };

        let first = ((bb.west + 180.0) / ZONE_WIDTH).floor() as i64;
        let last = ((bb.east + 180.0) / ZONE_WIDTH).ceil() as i64;

        let mut area = 0.0;
        for i in first..last {
            let west = -180.0 + ZONE_WIDTH * i as f64;
            let part = intersect( mp, &lon_lat_rect( west, bb.south, west + ZONE_WIDTH, bb.north));
            if part.0.is_empty() { continue }

            let north = centroid( &part).map_or( true, |(_,lat)| lat >= 0.0);
            let zone = UtmZone { zone: i.rem_euclid(60) as u32 + 1, north };
            area += self.area( &part, Crs::Wgs84, zone)?;
        }
        Ok(area)
    }
}

fn utm_to_geo_coord (c: Coord, zone: UtmZone) -> Result<Coord> {
    let (lon, lat) = utm_to_lon_lat( c.x, c.y, zone);
    if lon.is_finite() && lat.is_finite() {
        Ok( Coord{ x: lon, y: lat })
    } else {
        Err( projection_error!("({},{}) outside of UTM zone {}", c.x, c.y, zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "POLYGON((2 45, 3 45, 3 46, 2 46, 2 45))";

    #[test]
    fn test_parse_wkt () {
        let mp = parse_wkt( SQUARE).unwrap();
        assert_eq!( mp.0.len(), 1);
        assert_eq!( mp.unsigned_area(), 1.0);

        let mp = parse_wkt( "MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)),((5 5, 6 5, 6 6, 5 5)))").unwrap();
        assert_eq!( mp.0.len(), 2);

        assert!( parse_wkt( "POINT(1 2)").is_err());
        assert!( parse_wkt( "POLYGON((0 0, 1 0").is_err());
        // bow tie
        assert!( parse_wkt( "POLYGON((0 0, 1 1, 1 0, 0 1, 0 0))").is_err());
    }

    #[test]
    fn test_parse_geojson () {
        let s = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[2,45],[3,45],[3,46],[2,46],[2,45]]]}},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[2.5,45.5]}}
        ]}"#;
        let mp = parse_geojson( s).unwrap();
        assert_eq!( mp.0.len(), 1);

        assert!( parse_geojson( r#"{"type":"Point","coordinates":[2.5,45.5]}"#).is_err());
        assert!( parse_geojson( "{").is_err());
    }

    #[test]
    fn test_crs () {
        assert_eq!( Crs::from_srs_spec("EPSG:32631").unwrap(), Crs::Utm( UtmZone{ zone: 31, north: true }));
        assert_eq!( Crs::from_srs_spec("32755").unwrap(), Crs::Utm( UtmZone{ zone: 55, north: false }));
        assert_eq!( Crs::from_srs_spec("wgs84").unwrap(), Crs::Wgs84);
        assert_eq!( Crs::from_epsg(4326).unwrap().epsg(), 4326);
        assert!( Crs::from_epsg(3857).is_err());
        assert!( Crs::from_srs_spec("EPSG:32661").is_err());
    }

    #[test]
    fn test_densify () {
        let mp = parse_wkt( SQUARE).unwrap();
        let dense = densify( &mp, 0.1);
        assert_eq!( dense.0[0].exterior().0.len(), 41);
        assert!( (dense.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unwrap_longitudes () {
        let mp = parse_wkt( "POLYGON((179 10, -179 10, -179 11, 179 11, 179 10))").unwrap();
        let unwrapped = unwrap_longitudes( &mp);
        let bb = bbox( &unwrapped).unwrap();
        assert_eq!( (bb.west, bb.east), (179.0, 181.0));

        let mp = parse_wkt( SQUARE).unwrap();
        assert_eq!( unwrap_longitudes( &mp), mp);
    }

    #[test]
    fn test_reproject_roundtrip () {
        let ga = GeometryAdapter::default();
        let mp = parse_wkt( SQUARE).unwrap();
        let zone = UtmZone{ zone: 31, north: true };

        let utm = ga.reproject( &mp, Crs::Wgs84, Crs::Utm(zone)).unwrap();
        let area = utm.unsigned_area();
        // one square degree at 45.5N is about 111.2km x 78km
        assert!( area > 8.5e9 && area < 8.8e9, "area = {area}");

        let back = ga.reproject( &utm, Crs::Utm(zone), Crs::Wgs84).unwrap();
        let bb = bbox( &back).unwrap();
        assert!( (bb.west - 2.0).abs() < 1e-6 && (bb.north - 46.0).abs() < 1e-6);

        // foreign zone area stays close
        let area32 = ga.area( &mp, Crs::Wgs84, UtmZone{ zone: 32, north: true }).unwrap();
        assert!( (area32 - area).abs() / area < 0.01);

        assert!( ga.reproject( &mp, Crs::Wgs84, Crs::Utm( UtmZone{ zone: 1, north: true })).is_err());
    }

    #[test]
    fn test_geographic_area () {
        let ga = GeometryAdapter::default();
        let zone = UtmZone{ zone: 31, north: true };

        // within a single zone strip this is the same as the zone area
        let mp = parse_wkt( SQUARE).unwrap();
        let a1 = ga.geographic_area( &mp).unwrap();
        let a31 = ga.area( &mp, Crs::Wgs84, zone).unwrap();
        assert!( (a1 - a31).abs() / a31 < 1e-9, "{a1} != {a31}");

        // too wide for any single zone
        let band = parse_wkt( "POLYGON((1 45, 85 45, 85 46, 1 46, 1 45))").unwrap();
        assert!( ga.area( &band, Crs::Wgs84, zone).is_err());
        let a = ga.geographic_area( &band).unwrap();
        assert!( a > 83.0 * a31 && a < 85.0 * a31, "area = {a}");
    }

    #[test]
    fn test_clip_to_bbox () {
        let mp = parse_wkt( "POLYGON((1 45, 85 45, 85 46, 1 46, 1 45))").unwrap();
        let clipped = clip_to_bbox( &mp, &BoundingBox::new( 2.0, 44.0, 3.0, 47.0));
        assert!( (clipped.unsigned_area() - 1.0).abs() < 1e-9);

        assert!( clip_to_bbox( &mp, &BoundingBox::new( 100.0, 44.0, 101.0, 47.0)).0.is_empty());

        // box on the other side of the antimeridian
        let mp = parse_wkt( "POLYGON((179 60, 182 60, 182 61, 179 61, 179 60))").unwrap();
        let clipped = clip_to_bbox( &mp, &BoundingBox::new( -179.0, 59.0, -177.0, 62.0));
        assert!( (clipped.unsigned_area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_intersect () {
        let a = parse_wkt( SQUARE).unwrap();
        let b = parse_wkt( "POLYGON((2.5 45.5, 3.5 45.5, 3.5 46.5, 2.5 46.5, 2.5 45.5))").unwrap();
        let c = parse_wkt( "POLYGON((10 10, 11 10, 11 11, 10 11, 10 10))").unwrap();

        assert!( (intersect( &a, &b).unsigned_area() - 0.25).abs() < 1e-12);
        assert!( intersect( &a, &c).0.is_empty() || intersect( &a, &c).unsigned_area() == 0.0);
    }
}

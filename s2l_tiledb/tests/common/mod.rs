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
#![allow(unused)]

// a small synthetic grid around the UTM 31/32 zone boundary in southern France and across the antimeridian.
// MGRS tiles are 109.8km UTM squares like the real Sentinel-2 tiles, WRS tiles are lon/lat boxes
//
//   31TEJ  lon [3.000,4.399] lat [44.245,45.242]
//   31TFJ  lon [4.252,5.672] lat [44.223,45.235]
//   31TGJ  lon [5.504,6.943] lat [44.187,45.213]
//   31TEK  lon [3.000,4.421] lat [45.145,46.142]
//   32TLQ  lon [5.182,6.619] lat [44.192,45.216]
//   32TMQ  lon [6.453,7.870] lat [44.226,45.236]
//   60VXL  lon [177.0,179.0] lat [59.524,60.524]
//   01VCG  lon [-178.821,-176.821] lat [59.526,60.524]

use geo::{LineString, MultiPolygon, Polygon};
use s2l_common::utm::{UtmZone, utm_to_lon_lat};
use s2l_tiledb::{TileDb, TileFootprint, geometry::parse_wkt};

pub const MGRS_SIZE: f64 = 109_800.0;

pub fn lon_lat_box (west: f64, south: f64, east: f64, north: f64) -> String {
    format!("POLYGON(({west} {south}, {east} {south}, {east} {north}, {west} {north}, {west} {south}))")
}

pub fn mgrs_tile (code: &str, zone: u32, e0: f64, n0: f64) -> TileFootprint {
    let utm_zone = UtmZone::new( zone, true).unwrap();
    let corners = vec![ (e0,n0), (e0+MGRS_SIZE,n0), (e0+MGRS_SIZE,n0+MGRS_SIZE), (e0,n0+MGRS_SIZE), (e0,n0) ];
    let ll: Vec<(f64,f64)> = corners.iter().map( |(e,n)| utm_to_lon_lat( *e, *n, utm_zone)).collect();

    let utm = MultiPolygon::new( vec![ Polygon::new( LineString::from( corners), vec![]) ]);
    let geo = MultiPolygon::new( vec![ Polygon::new( LineString::from( ll), vec![]) ]);

    TileFootprint::mgrs( code.parse().unwrap(), utm_zone.epsg(), geo, utm).unwrap()
}

pub fn wrs_tile (path_row: &str, zone: u32, wkt: &str) -> TileFootprint {
    TileFootprint::wrs( path_row.parse().unwrap(), zone, parse_wkt( wkt).unwrap()).unwrap()
}

pub fn mgrs_tiles () -> Vec<TileFootprint> {
    vec![
        mgrs_tile( "31TEJ", 31, 500_000.0, 4_900_000.0),
        mgrs_tile( "31TFJ", 31, 600_000.0, 4_900_000.0),
        mgrs_tile( "31TGJ", 31, 700_000.0, 4_900_000.0),
        mgrs_tile( "31TEK", 31, 500_000.0, 5_000_000.0),
        mgrs_tile( "32TLQ", 32, 200_000.0, 4_900_000.0),
        mgrs_tile( "32TMQ", 32, 300_000.0, 4_900_000.0),
        mgrs_tile( "60VXL", 60, 500_000.0, 6_600_000.0),
        mgrs_tile( "01VCG",  1, 400_000.0, 6_600_000.0),
    ]
}

pub fn wrs_tiles () -> Vec<TileFootprint> {
    vec![
        wrs_tile( "196_30", 31, &lon_lat_box( 1.0, 43.0, 5.0, 47.0)),
        wrs_tile( "195_30", 32, &lon_lat_box( 5.2, 44.0, 8.0, 45.5)),
        wrs_tile( "120_65", 47, &lon_lat_box( 100.0, -10.0, 102.0, -8.0)),
        // crosses the antimeridian
        wrs_tile( "81_17", 60, "POLYGON((176.5 59.5, -178.5 59.5, -178.5 61, 176.5 61, 176.5 59.5))"),
    ]
}

pub fn synthetic_db () -> TileDb {
    TileDb::from_footprints( wrs_tiles(), mgrs_tiles()).unwrap()
}

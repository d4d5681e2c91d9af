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

use s2l_common::geo::GeoPoint;
use s2l_common::utm::*;

// run with "cargo test test_xx -- --nocapture"

fn assert_close (a: f64, b: f64, eps: f64) {
    assert!( (a - b).abs() <= eps, "{a} != {b} (eps {eps})");
}

#[test]
fn test_central_meridian () {
    // 45N on the central meridian of zone 31: easting is the false easting, northing is k0 * meridian arc
    let z31n = UtmZone::new( 31, true).unwrap();
    let utm = lon_lat_to_utm( 3.0, 45.0, z31n).unwrap();
    println!("3E,45N -> {utm:?}");
    assert_close( utm.easting, 500000.0, 1e-6);
    assert_close( utm.northing, 4982950.4, 1.0);

    // southern hemisphere uses a 10000km false northing
    let z31s = UtmZone::new( 31, false).unwrap();
    let utm = lon_lat_to_utm( 3.0, -10.0, z31s).unwrap();
    assert_close( utm.northing, 10_000_000.0 - 1105412.5, 1.0);
}

#[test]
fn test_symmetry () {
    let z = UtmZone::new( 33, true).unwrap(); // central meridian 15E
    let east = lon_lat_to_utm( 17.5, 41.0, z).unwrap();
    let west = lon_lat_to_utm( 12.5, 41.0, z).unwrap();
    assert_close( east.easting - 500000.0, 500000.0 - west.easting, 1e-6);
    assert_close( east.northing, west.northing, 1e-6);
}

#[test]
fn test_roundtrip () {
    let points = [ (4.8, 43.9), (12.45, 41.9), (-122.3, 37.5), (151.2, -33.9), (-70.6, -53.1), (25.0, 80.5) ];

    for (lon,lat) in points {
        let geo = GeoPoint::from_lon_lat_degrees( lon, lat);
        let utm = geo_to_utm( &geo).unwrap();
        let (lon1,lat1) = utm_to_lon_lat( utm.easting, utm.northing, utm.utm_zone);
        println!("{geo} -> {:.3},{:.3} {} -> [{lon1},{lat1}]", utm.easting, utm.northing, utm.utm_zone);
        assert_close( lon1, lon, 1e-7);
        assert_close( lat1, lat, 1e-7);
    }
}

#[test]
fn test_foreign_zone () {
    // Rome is in zone 33 but can be projected into the western neighbor zone
    let z32 = UtmZone::new( 32, true).unwrap();
    let utm = lon_lat_to_utm( 12.45, 41.9, z32).unwrap();
    assert!( utm.easting > 760000.0); // beyond the nominal 6deg zone width
    let (lon,lat) = utm_to_lon_lat( utm.easting, utm.northing, z32);
    assert_close( lon, 12.45, 1e-7);
    assert_close( lat, 41.9, 1e-7);

    // positions on the other side of the globe can't be projected
    assert!( lon_lat_to_utm( -170.0, 10.0, z32).is_none());
}

#[test]
fn test_antimeridian_continuity () {
    // zone 60 spans 174E..180E, positions slightly beyond the antimeridian stay continuous
    let z60 = UtmZone::new( 60, false).unwrap();
    let west = lon_lat_to_utm( 179.9, -17.0, z60).unwrap();
    let east = lon_lat_to_utm( -179.9, -17.0, z60).unwrap();
    assert!( east.easting > west.easting);

    let (lon,_) = utm_to_lon_lat( east.easting, east.northing, z60);
    assert_close( lon, 180.1, 1e-7);
}

#[test]
fn test_zones () {
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( 4.8, 43.9)), 31);
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( 12.45, 41.9)), 33);
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( -180.0, 0.0)), 1);
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( 179.99, 0.0)), 60);

    // Norway and Svalbard exceptions
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( 5.0, 60.0)), 32);
    assert_eq!( utm_zone( &GeoPoint::from_lon_lat_degrees( 10.0, 78.0)), 33);

    assert_eq!( UtmZone::from_epsg( 32631), Some( UtmZone{ zone: 31, north: true }));
    assert_eq!( UtmZone::from_epsg( 32755), Some( UtmZone{ zone: 55, north: false }));
    assert_eq!( UtmZone::from_epsg( 4326), None);
    assert_eq!( UtmZone::from_epsg( 32661), None);
    assert_eq!( UtmZone::new( 33, false).unwrap().epsg(), 32733);
}

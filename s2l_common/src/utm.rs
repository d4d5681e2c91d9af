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
#![allow(unused,uncommon_codepoints,non_snake_case)]

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::*;
use crate::angle::lon_delta;
use crate::geo::GeoPoint;

/// EPSG code ranges of the WGS84 / UTM zone systems
pub const EPSG_UTM_NORTH: u32 = 32600;
pub const EPSG_UTM_SOUTH: u32 = 32700;

/// a UTM zone with its hemisphere, which determines the false northing
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct UtmZone {
    pub zone: u32,
    pub north: bool,
}

impl UtmZone {
    pub fn new (zone: u32, north: bool) -> Option<UtmZone> {
        if zone >= 1 && zone <= 60 { Some( UtmZone{zone,north} ) } else { None }
    }

    /// 326zz (north) or 327zz (south)
    pub fn from_epsg (epsg: u32) -> Option<UtmZone> {
        match epsg {
            32601..=32660 => Some( UtmZone{ zone: epsg - EPSG_UTM_NORTH, north: true }),
            32701..=32760 => Some( UtmZone{ zone: epsg - EPSG_UTM_SOUTH, north: false }),
            _ => None
        }
    }

    /// the zone a geographic position falls into, including the Norway and Svalbard exceptions
    pub fn for_geo (geo: &GeoPoint) -> UtmZone {
        UtmZone { zone: utm_zone(geo), north: geo.latitude_degrees() >= 0.0 }
    }

    pub fn epsg (&self) -> u32 {
        if self.north { EPSG_UTM_NORTH + self.zone } else { EPSG_UTM_SOUTH + self.zone }
    }

    pub fn central_meridian (&self) -> f64 { (self.zone as f64)*6.0 - 183.0 }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.zone, if self.north {'N'} else {'S'})
    }
}

/// zone number of a geographic position
pub fn utm_zone (geo: &GeoPoint) -> u32 {
    let lat_deg = geo.latitude_degrees();
    let lon_deg = geo.longitude_degrees();

    // handle special cases (Norway/Svalbard)
    if lat_deg >= 56.0 && lat_deg < 64.0 && lon_deg >= 3.0 && lon_deg < 12.0 {
        return 32
    }

    if lat_deg >= 72.0 {
        if lon_deg >= 0.0 && lon_deg < 9.0 { return 31 }
        if lon_deg >= 9.0 && lon_deg < 21.0 { return 33 }
        if lon_deg >= 21.0 && lon_deg < 33.0 { return 35 }
        if lon_deg >= 33.0 && lon_deg < 42.0 { return 37 }
    }

    (((lon_deg + 180.0) / 6.0).floor() as u32 % 60) + 1
}

/// projected position in a given UTM zone (meters)
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct UTM {
    pub easting: f64,
    pub northing: f64,
    pub utm_zone: UtmZone,
}

// Krueger series - see https://en.wikipedia.org/wiki/Universal_Transverse_Mercator_coordinate_system
// lengths are computed in km and scaled at the end

const E0: f64 = 500.0; // false easting [km]
const N0_SOUTH: f64 = 10000.0; // false northing of southern zones [km]
const K0_A: f64 = 6364.902166165087; // k0 * A

// the series diverges when approaching 90deg from the central meridian
const MAX_LON_DELTA: f64 = 80.0;

/// forward projection into an explicitly given zone, which does not have to be the natural zone of `geo`.
/// Returns None if the position is too far from the zone's central meridian
pub fn geo_to_utm_zone (geo: &GeoPoint, utm_zone: UtmZone) -> Option<UTM> {
    lon_lat_to_utm( geo.longitude_degrees(), geo.latitude_degrees(), utm_zone)
}

/// forward projection of raw lon/lat degrees. Longitudes do not have to be normalized
pub fn lon_lat_to_utm (lon_deg: f64, lat_deg: f64, utm_zone: UtmZone) -> Option<UTM> {
    // let n = 0.0016792203863837047 // f / (2.0 - f)
    let α1 = 8.377318188192541E-4; // n/2.0 - (2.0/3.0)*n2 + (5.0/16.0)*n3
    let α2 = 7.608496958699166E-7; // (13.0/48.0)*n2 - (3.0/5.0)*n3
    let α3 = 1.2034877875966646E-9; // (61.0/240.0)*n3
    let C = 0.08181919084262149; // (2.0*sqrt(n)) / (1.0 + n)

    let dλ_deg = lon_delta( lon_deg, utm_zone.central_meridian());
    if dλ_deg.abs() > MAX_LON_DELTA || lat_deg.abs() > 90.0 { return None }

    let φ = lat_deg.to_radians();
    let dλ = dλ_deg.to_radians();
    let N0 = if utm_zone.north { 0.0 } else { N0_SOUTH };

    let sin_φ = sin(φ);
    let t = sinh( atanh(sin_φ) - C * atanh( C*sin_φ));

    let ξ = atan2( t, cos(dλ));
    let ξ2 = ξ * 2.0;
    let ξ4 = ξ * 4.0;
    let ξ6 = ξ * 6.0;

    let η = atanh( sin(dλ) / sqrt(1.0 + t*t));
    let η2 = η * 2.0;
    let η4 = η * 4.0;
    let η6 = η * 6.0;

    let easting = (E0 + K0_A*(η + (α1 * cos(ξ2)*sinh(η2)) + (α2 * cos(ξ4)*sinh(η4)) + (α3 * cos(ξ6)*sinh(η6)))) * 1000.0;
    let northing = (N0 + K0_A*(ξ + (α1 * sin(ξ2)*cosh(η2)) + (α2 * sin(ξ4)*cosh(η4)) + (α3 * sin(ξ6)*cosh(η6)))) * 1000.0;

    if easting.is_finite() && northing.is_finite() {
        Some( UTM {easting, northing, utm_zone} )
    } else {
        None
    }
}

/// forward projection into the natural zone of `geo_point`
pub fn geo_to_utm (geo_point: &GeoPoint) -> Option<UTM> {
    geo_to_utm_zone( geo_point, UtmZone::for_geo(geo_point))
}

/// inverse projection, returns (lon,lat) degrees. Longitudes are not normalized so that positions
/// east of the antimeridian in zone 60 stay continuous
pub fn utm_to_lon_lat (easting: f64, northing: f64, utm_zone: UtmZone) -> (f64,f64) {
    let N = northing / 1000.0;
    let E = easting / 1000.0;

    let β1 = 0.000837732164082144;
    let β2 = 0.00000005906110863719917;
    let β3 = 0.00000000016769911794379754;
    let δ1 = 0.003356551448628875;
    let δ2 = 0.000006571913193172695;
    let δ3 = 0.0000000176774599620756;

    let N0 = if utm_zone.north { 0.0 } else { N0_SOUTH };

    let ξ = (N - N0)/K0_A;
    let ξ2 = ξ * 2.0;
    let ξ4 = ξ * 4.0;
    let ξ6 = ξ * 6.0;

    let η = (E - E0)/K0_A;
    let η2 = η * 2.0;
    let η4 = η * 4.0;
    let η6 = η * 6.0;

    let ξʹ = ξ - ((β1*sin(ξ2)*cosh(η2)) + (β2*sin(ξ4)*cosh(η4)) + (β3*sin(ξ6)*cosh(η6)));
    let ηʹ = η - ((β1*cos(ξ2)*sinh(η2)) + (β2*cos(ξ4)*sinh(η4)) + (β3*cos(ξ6)*sinh(η6)));

    let χ = asin( sin(ξʹ) / cosh(ηʹ));

    let φ = χ + (δ1*sin(2.0*χ)) + (δ2*sin(4.0*χ)) + (δ3*sin(6.0*χ));
    let λ = utm_zone.central_meridian().to_radians() + atan2( sinh(ηʹ), cos(ξʹ));

    (λ.to_degrees(), φ.to_degrees())
}

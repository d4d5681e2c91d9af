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

/// latitude in degrees folded into [-90,90]
#[inline]
pub fn normalize_90 (d:f64) -> f64 {
    let x = d % 360.0;

    if x < -90.0 { -180.0 - x }
    else if x > 90.0 { 180.0 - x }
    else { x }
}

/// longitude in degrees wrapped into [-180,180]
#[inline]
pub fn normalize_180 (d: f64) -> f64 {
    let x = d % 360.0;

    if x < -180.0 { 360.0 + x }
    else if x > 180.0 { x - 360.0 }
    else { x }
}

/// signed shortest longitude difference `lon - ref_lon` in degrees, within [-180,180]
#[inline]
pub fn lon_delta (lon: f64, ref_lon: f64) -> f64 {
    normalize_180( lon - ref_lon)
}

/// does the sequence of longitudes jump across the antimeridian, i.e. span more than half the globe
pub fn spans_antimeridian<I> (lons: I) -> bool where I: IntoIterator<Item=f64> {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for lon in lons {
        if lon < min { min = lon }
        if lon > max { max = lon }
    }
    max - min > 180.0
}

/// shift western hemisphere longitudes east by 360deg so that antimeridian crossing geometries become continuous
#[inline]
pub fn unwrap_lon (lon: f64) -> f64 {
    if lon < 0.0 { lon + 360.0 } else { lon }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize () {
        assert_eq!( normalize_180( 200.0), -160.0);
        assert_eq!( normalize_180( -190.0), 170.0);
        assert_eq!( normalize_90( 100.0), 80.0);
    }

    #[test]
    fn test_lon_delta () {
        assert_eq!( lon_delta( 179.0, -177.0), -4.0);
        assert_eq!( lon_delta( -179.0, 177.0), 4.0);
        assert_eq!( lon_delta( 5.0, 3.0), 2.0);
    }

    #[test]
    fn test_antimeridian () {
        assert!( spans_antimeridian( [179.5, -179.5, -179.0, 179.0]));
        assert!( !spans_antimeridian( [2.0, 4.5, 4.0]));
        assert_eq!( unwrap_lon( -179.5), 180.5);
    }
}

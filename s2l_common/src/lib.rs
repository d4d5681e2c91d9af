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
#![allow(unused,uncommon_codepoints)]

//! geodesy support shared by the s2l crates: angle normalization, geographic points and boxes,
//! UTM zones and the UTM projection, and config path expansion

use serde::{Serialize,Deserialize};
use num::{Num,ToPrimitive};

pub mod angle;
pub mod geo;
pub mod utm;
pub mod fs;

// syntactic sugar - this is just more readable in many cases
#[inline(always)] pub fn sin(x:f64) -> f64 { x.sin() }
#[inline(always)] pub fn cos(x:f64) -> f64 { x.cos() }
#[inline(always)] pub fn sinh(x:f64) -> f64 { x.sinh() }
#[inline(always)] pub fn cosh(x:f64) -> f64 { x.cosh() }
#[inline(always)] pub fn asin(x:f64) -> f64 {x.asin() }
#[inline(always)] pub fn atan2(y:f64,x:f64) -> f64 { y.atan2(x) }
#[inline(always)] pub fn atanh(x:f64) -> f64 { x.atanh() }
#[inline(always)] pub fn sqrt(x:f64) -> f64 { x.sqrt() }

/// a generic bounding box without semantics for the coordinate type
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy + ToPrimitive> BoundingBox<T> {
    pub fn new(west: T, south: T, east: T, north: T)->Self {
        BoundingBox{ west, south, east, north}
    }
}

impl BoundingBox<f64> {
    /// smallest box enclosing all (x,y) pairs, None if there are none
    pub fn from_coords<I> (coords: I) -> Option<Self> where I: IntoIterator<Item=(f64,f64)> {
        let mut it = coords.into_iter();
        let (x0,y0) = it.next()?;
        let mut bbox = BoundingBox::new( x0, y0, x0, y0);
        for (x,y) in it { bbox.add(x, y) }
        Some(bbox)
    }

    pub fn add (&mut self, x: f64, y: f64) {
        if x < self.west { self.west = x }
        if x > self.east { self.east = x }
        if y < self.south { self.south = y }
        if y > self.north { self.north = y }
    }

    pub fn center (&self) -> (f64,f64) {
        ( (self.west + self.east) / 2.0, (self.south + self.north) / 2.0 )
    }

    /// longitude intervals of a geographic box that might extend beyond the antimeridian
    /// (west < -180 or east > 180), split into intervals within [-180,180]
    pub fn lon_ranges (&self) -> Vec<(f64,f64)> {
        let (mut west, mut east) = (self.west, self.east);
        if west >= 180.0 { west -= 360.0; east -= 360.0 }
        if east <= -180.0 { west += 360.0; east += 360.0 }

        if east - west >= 360.0 {
            vec![ (-180.0, 180.0) ]
        } else if east > 180.0 {
            vec![ (west, 180.0), (-180.0, east - 360.0) ]
        } else if west < -180.0 {
            vec![ (west + 360.0, 180.0), (-180.0, east) ]
        } else {
            vec![ (west, east) ]
        }
    }
}

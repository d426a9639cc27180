// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Small geometric value types shared by commands and backends.

use serde::{Deserialize, Serialize};

/// An integer rectangle given by its origin and extent, in pixels.
///
/// Used for scissor and viewport state. No validation is performed; the
/// values are handed to the backend as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A rectangle given by two corners, as used by framebuffer blits.
///
/// `(x0, y0)` is inclusive and `(x1, y1)` exclusive. Swapping the corners
/// mirrors the copied image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlitRegion {
    /// First corner, X.
    pub x0: i32,
    /// First corner, Y.
    pub y0: i32,
    /// Second corner, X.
    pub x1: i32,
    /// Second corner, Y.
    pub y1: i32,
}

impl BlitRegion {
    /// Creates a region from its two corners.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// The region covering `width` x `height` pixels from the origin.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }
}

//! Self-describing cluster identifiers.
//!
//! An id packs the zoom level a record lives on into its low five bits and
//! the record's position in that level's array into the remaining bits, so
//! decoding needs no lookup table.

use serde::{Deserialize, Serialize};
use std::fmt;

const ZOOM_BITS: u32 = 5;
const ZOOM_MASK: u64 = (1 << ZOOM_BITS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Encode a `(zoom, index)` pair. `zoom` must be below 32.
    pub fn new(zoom: u8, index: u32) -> Self {
        debug_assert!((zoom as u64) <= ZOOM_MASK);
        Self(((index as u64) << ZOOM_BITS) | (zoom as u64 & ZOOM_MASK))
    }

    /// Wrap a raw id received from a caller. Use [`ClusterId::decode`] to check it.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn zoom(self) -> u8 {
        (self.0 & ZOOM_MASK) as u8
    }

    /// Array position, or `None` if the raw value cannot address a record.
    pub fn index(self) -> Option<u32> {
        u32::try_from(self.0 >> ZOOM_BITS).ok()
    }

    pub fn decode(self) -> Option<(u8, u32)> {
        self.index().map(|index| (self.zoom(), index))
    }
}

impl From<u64> for ClusterId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<ClusterId> for u64 {
    fn from(id: ClusterId) -> Self {
        id.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

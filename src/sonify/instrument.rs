// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fmt;

use serde::Serialize;

/// The highest instrument id a classifier may report. Anything above is
/// treated as background.
pub const MAX_INSTRUMENT_ID: u8 = 63;

/// The instrument category a pixel is classified into. Each id drives at most
/// one voice at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct InstrumentId(u8);

impl InstrumentId {
    /// No object, or a coordinate outside of the image.
    pub const BACKGROUND: InstrumentId = InstrumentId(0);

    /// The low drone used for large uniform regions. It never counts as an
    /// object pixel, so it can't trigger edges or haptics.
    pub const BASS: InstrumentId = InstrumentId(1);

    /// Plays for point-like features. It counts as an object pixel but is never
    /// flagged as being on an edge.
    pub const XYLOPHONE: InstrumentId = InstrumentId(2);

    /// Creates an instrument id. Out of range values collapse to background.
    pub const fn new(id: u8) -> InstrumentId {
        if id > MAX_INSTRUMENT_ID {
            InstrumentId::BACKGROUND
        } else {
            InstrumentId(id)
        }
    }

    /// Creates an instrument id, rejecting out of range values.
    pub fn checked(id: u8) -> Option<InstrumentId> {
        (id <= MAX_INSTRUMENT_ID).then_some(InstrumentId(id))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_background(self) -> bool {
        self == InstrumentId::BACKGROUND
    }

    /// True if this id counts toward a layer's object tally and haptic trigger.
    pub fn is_object(self) -> bool {
        !self.is_background() && self != InstrumentId::BASS
    }

    /// True if this id may be flagged as sitting on an object edge.
    pub fn marks_edges(self) -> bool {
        self != InstrumentId::XYLOPHONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_collapses_to_background() {
        let max = InstrumentId::new(MAX_INSTRUMENT_ID);
        assert_eq!(max.value(), MAX_INSTRUMENT_ID);
        assert!(InstrumentId::new(MAX_INSTRUMENT_ID + 1).is_background());
        assert!(InstrumentId::new(255).is_background());
        assert_eq!(InstrumentId::checked(200), None);
        assert_eq!(InstrumentId::checked(7), Some(InstrumentId::new(7)));
    }

    #[test]
    fn test_special_ids() {
        assert!(!InstrumentId::BACKGROUND.is_object());
        assert!(!InstrumentId::BASS.is_object());
        assert!(InstrumentId::BASS.marks_edges());
        assert!(InstrumentId::XYLOPHONE.is_object());
        assert!(!InstrumentId::XYLOPHONE.marks_edges());
        assert!(InstrumentId::new(5).is_object());
        assert!(InstrumentId::new(5).marks_edges());
    }
}

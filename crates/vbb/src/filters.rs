//! Query filters for location search and departure boards
//!
//! Both filters are bit sets that compose with `|`. On the wire every member
//! becomes its own `true`/`false` query parameter; the combined bits are never
//! sent as a single value.

use bitflags::bitflags;

bitflags! {
    /// Kinds of location a search should return
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LocationTypes: u8 {
        /// Transit stops and stations
        const STOPS = 1;
        /// Street addresses
        const ADDRESSES = 1 << 1;
        /// Points of interest
        const POI = 1 << 2;
        /// Every kind of location
        const ANY = Self::STOPS.bits() | Self::ADDRESSES.bits() | Self::POI.bits();
    }
}

impl LocationTypes {
    /// Boolean query parameters, one per location kind
    #[must_use]
    pub fn query_params(self) -> [(&'static str, &'static str); 3] {
        [
            ("stops", bool_str(self.contains(Self::STOPS))),
            // The service reads `addresses`; a misspelled `addresss` is silently ignored
            ("addresses", bool_str(self.contains(Self::ADDRESSES))),
            ("poi", bool_str(self.contains(Self::POI))),
        ]
    }
}

impl Default for LocationTypes {
    fn default() -> Self {
        Self::ANY
    }
}

bitflags! {
    /// Transport modes a departure or arrival board should include
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransportModes: u8 {
        /// S-Bahn
        const SUBURBAN = 1;
        /// U-Bahn
        const SUBWAY = 1 << 1;
        /// Tram
        const TRAM = 1 << 2;
        /// Bus
        const BUS = 1 << 3;
        /// Ferry
        const FERRY = 1 << 4;
        /// Long-distance express trains (ICE/IC/EC)
        const EXPRESS = 1 << 5;
        /// Regional trains (RE/RB)
        const REGIONAL = 1 << 6;
        /// Everything but long-distance express trains
        const URBAN = Self::SUBURBAN.bits()
            | Self::SUBWAY.bits()
            | Self::TRAM.bits()
            | Self::BUS.bits()
            | Self::FERRY.bits()
            | Self::REGIONAL.bits();
        /// Every transport mode
        const ALL = Self::URBAN.bits() | Self::EXPRESS.bits();
    }
}

impl TransportModes {
    /// Boolean query parameters, one per transport mode
    #[must_use]
    pub fn query_params(self) -> [(&'static str, &'static str); 7] {
        [
            ("suburban", bool_str(self.contains(Self::SUBURBAN))),
            ("subway", bool_str(self.contains(Self::SUBWAY))),
            ("tram", bool_str(self.contains(Self::TRAM))),
            ("bus", bool_str(self.contains(Self::BUS))),
            ("ferry", bool_str(self.contains(Self::FERRY))),
            ("express", bool_str(self.contains(Self::EXPRESS))),
            ("regional", bool_str(self.contains(Self::REGIONAL))),
        ]
    }
}

impl Default for TransportModes {
    fn default() -> Self {
        Self::ALL
    }
}

/// Convert bool to "true"/"false" str for query params
pub(crate) const fn bool_str(val: bool) -> &'static str {
    if val { "true" } else { "false" }
}

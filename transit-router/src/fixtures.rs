//! Shared test networks.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{StopId, TransportMode};
use crate::geo::lat_offset_deg;
use crate::network::{Graph, GraphBuilder, Network, NewStop};

pub const BASE_LAT: f64 = -2.98;
pub const BASE_LON: f64 = 104.74;

/// Coordinates `north_km` and `east_km` away from the fixture origin.
pub fn at(north_km: f64, east_km: f64) -> (f64, f64) {
    let lat = BASE_LAT + lat_offset_deg(north_km);
    let lon = BASE_LON + lat_offset_deg(east_km) / BASE_LAT.to_radians().cos();
    (lat, lon)
}

pub fn departure() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

pub fn add(
    builder: &mut GraphBuilder,
    code: &str,
    name: &str,
    (north_km, east_km): (f64, f64),
    mode: TransportMode,
    route: &str,
) -> StopId {
    let (lat, lon) = at(north_km, east_km);
    builder
        .add_stop(NewStop::new(code, name, lat, lon, mode, route))
        .unwrap()
}

/// A small city:
///
/// - rail line `lrt_1 .. lrt_4` running east along the base latitude,
///   3 km apart
/// - bus line `bus_1 .. bus_3` running north from 200 m beside `lrt_2`
/// - feeder minivan `f_1 -> f_2` starting beside `lrt_3`
/// - `iso_1`, a stop with no connections
///
/// All lines run in both directions.
pub fn city_graph() -> Graph {
    use TransportMode::*;

    let mut b = Graph::builder();
    let rail = [
        add(&mut b, "lrt_1", "Bandara SMB II", (0.0, 0.0), Rail, "LRT Sumsel"),
        add(&mut b, "lrt_2", "Asrama Haji", (0.0, 3.0), Rail, "LRT Sumsel"),
        add(&mut b, "lrt_3", "Punti Kayu", (0.0, 6.0), Rail, "LRT Sumsel"),
        add(&mut b, "lrt_4", "DJKA", (0.0, 9.0), Rail, "LRT Sumsel"),
    ];
    let bus = [
        add(&mut b, "bus_1", "Simpang Asrama Haji", (0.2, 3.0), Bus, "Teman Bus Koridor 1"),
        add(&mut b, "bus_2", "Kambang Iwak", (3.0, 3.0), Bus, "Teman Bus Koridor 1"),
        add(&mut b, "bus_3", "Sukarami", (6.0, 3.0), Bus, "Teman Bus Koridor 1"),
    ];
    let feeder = [
        add(&mut b, "f_1", "Pasar Punti Kayu", (0.25, 6.1), Minivan, "Feeder 4"),
        add(&mut b, "f_2", "Plaju", (2.0, 7.0), Minivan, "Feeder 4"),
    ];
    add(&mut b, "iso_1", "Pulau Kemaro", (-10.0, 20.0), Minivan, "Feeder 9");

    b.add_line(&rail).unwrap();
    b.add_line(&bus).unwrap();
    b.add_line(&feeder).unwrap();
    b.build()
}

pub fn city() -> Network {
    Network::new(city_graph())
}

pub fn id(network: &Network, code: &str) -> StopId {
    network
        .stop_id(code)
        .unwrap_or_else(|| panic!("fixture has no stop {code}"))
}

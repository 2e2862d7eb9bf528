//! WMO weather interpretation codes, as reported by the backend forecast
//! payload in `weathercode` fields.

/// Human-readable description for a weather code.
///
/// Unrecognized codes fall back to `"Unknown"` rather than failing.
pub fn describe(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Drizzle: light",
        53 => "Drizzle: moderate",
        55 => "Drizzle: dense",
        56 => "Freezing drizzle: light",
        57 => "Freezing drizzle: dense",
        61 => "Rain: slight",
        63 => "Rain: moderate",
        65 => "Rain: heavy",
        66 => "Freezing rain: light",
        67 => "Freezing rain: heavy",
        71 => "Snowfall: slight",
        73 => "Snowfall: moderate",
        75 => "Snowfall: heavy",
        77 => "Snow grains",
        80 => "Rain showers: slight",
        81 => "Rain showers: moderate",
        82 => "Rain showers: violent",
        85 => "Snow showers: slight",
        86 => "Snow showers: heavy",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

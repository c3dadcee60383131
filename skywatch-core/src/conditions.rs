//! Mapping from the provider's condition taxonomy to the internal
//! condition-code space consumed by display logic.

/// Map an OpenWeatherMap condition id, plus the day/night hint carried in the
/// icon name, to an internal condition code. The table mirrors the provider's
/// published id list; anything unlisted maps to -1, which callers treat as
/// "unrecognized", not as an error.
pub fn map_condition(id: i32, icon: &str) -> i32 {
    match id {
        // Thunderstorms
        202 | 232 | 211 => 4, // with heavy rain / heavy drizzle / plain
        212 => 3,             // heavy thunderstorm
        221 | 231 | 201 => 38, // ragged / with drizzle / with rain
        230 | 200 | 210 => 37, // with light drizzle / light rain / light

        // Drizzle; every subvariant collapses to one code
        300 | 301 | 302 | 310 | 311 | 312 | 313 | 314 | 321 => 9,

        // Rain
        500 | 501 | 520 | 521 | 531 => 11, // light to moderate, showers
        502 | 503 | 504 | 522 => 12,       // heavy to extreme
        511 => 10,                         // freezing rain

        // Snow
        600 | 620 => 14, // light snow
        601 | 621 => 16, // snow
        602 | 622 => 41, // heavy snow
        611 | 612 => 18, // sleet
        615 | 616 => 5,  // rain and snow

        // Atmosphere
        741 => 20,             // fog
        711 | 762 => 22,       // smoke, volcanic ash
        701 | 721 => 21,       // mist, haze
        731 | 751 | 761 => 19, // sand/dust whirls, sand, dust
        771 => 23,             // squalls
        781 => 0,              // tornado

        // Clouds: the icon suffix distinguishes day from night
        800 => {
            if icon.ends_with('n') { 31 } else { 32 } // clear sky
        }
        801 => {
            if icon.ends_with('n') { 33 } else { 34 } // few clouds
        }
        802 => {
            if icon.ends_with('n') { 27 } else { 28 } // scattered clouds
        }
        803 | 804 => {
            if icon.ends_with('n') { 29 } else { 30 } // broken, overcast
        }

        // Extreme
        900 => 0,  // tornado
        901 => 1,  // tropical storm
        902 => 2,  // hurricane
        903 => 25, // cold
        904 => 36, // hot
        905 => 24, // windy
        906 => 17, // hail

        _ => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_sky_splits_on_day_night() {
        let day = map_condition(800, "01d");
        let night = map_condition(800, "01n");

        assert_eq!(day, 32);
        assert_eq!(night, 31);
        assert_ne!(day, night);
    }

    #[test]
    fn cloud_variants_split_on_day_night() {
        assert_eq!(map_condition(801, "02d"), 34);
        assert_eq!(map_condition(801, "02n"), 33);
        assert_eq!(map_condition(802, "03d"), 28);
        assert_eq!(map_condition(802, "03n"), 27);
        assert_eq!(map_condition(803, "04d"), 30);
        assert_eq!(map_condition(804, "04n"), 29);
    }

    #[test]
    fn many_to_one_groups() {
        assert_eq!(map_condition(202, "11d"), 4);
        assert_eq!(map_condition(232, "11n"), 4);
        assert_eq!(map_condition(211, "11d"), 4);

        for id in [300, 301, 302, 310, 311, 312, 313, 314, 321] {
            assert_eq!(map_condition(id, "09d"), 9);
        }
    }

    #[test]
    fn rain_and_snow_codes() {
        assert_eq!(map_condition(511, "13d"), 10);
        assert_eq!(map_condition(502, "10n"), 12);
        assert_eq!(map_condition(600, "13d"), 14);
        assert_eq!(map_condition(622, "13n"), 41);
        assert_eq!(map_condition(615, "13d"), 5);
    }

    #[test]
    fn atmosphere_and_extremes() {
        assert_eq!(map_condition(741, "50d"), 20);
        assert_eq!(map_condition(762, "50n"), 22);
        assert_eq!(map_condition(781, "50d"), 0);
        assert_eq!(map_condition(902, ""), 2);
        assert_eq!(map_condition(906, ""), 17);
    }

    #[test]
    fn unmodeled_id_yields_minus_one() {
        assert_eq!(map_condition(999, "01d"), -1);
        assert_eq!(map_condition(0, ""), -1);
        assert_eq!(map_condition(-5, "01n"), -1);
    }
}

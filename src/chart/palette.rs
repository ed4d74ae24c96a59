use rustc_hash::FxHashMap;

use crate::core::constants::charts::PALETTE;

/// Group value to display colour, built per chart.
///
/// Colours are assigned in enumeration order, cycling through the palette.
/// Two charts over different group sets may colour the same value
/// differently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMap {
    entries: Vec<(String, &'static str)>,
    index: FxHashMap<String, usize>,
}

impl ColorMap {
    /// Assign colours to `keys` in order; repeated keys keep their first colour
    pub fn assign<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = Self::default();
        for key in keys {
            let key = key.into();
            if map.index.contains_key(&key) {
                continue;
            }
            let color = palette_color(map.entries.len());
            map.index.insert(key.clone(), map.entries.len());
            map.entries.push((key, color));
        }
        map
    }

    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// `#RRGGBB` as a CSS `rgba()` with the given opacity. Anything else is
/// returned unchanged.
pub fn with_opacity(hex: &str, alpha: f64) -> String {
    let channels = hex
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.is_ascii())
        .and_then(|h| {
            let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        });

    match channels {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
        None => hex.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_cycles_palette() {
        let keys: Vec<String> = (0..12).map(|i| format!("g{i}")).collect();
        let map = ColorMap::assign(keys.iter().cloned());

        assert_eq!(map.len(), 12);
        assert_eq!(map.get("g0"), Some(PALETTE[0]));
        assert_eq!(map.get("g9"), Some(PALETTE[9]));
        assert_eq!(map.get("g10"), Some(PALETTE[0]));
        assert_eq!(map.get("g11"), Some(PALETTE[1]));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn test_assign_keeps_first_colour_for_duplicates() {
        let map = ColorMap::assign(["A", "B", "A", "C"]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("C"), Some(PALETTE[2]));
        let order: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_with_opacity() {
        assert_eq!(with_opacity("#636EFA", 0.6), "rgba(99, 110, 250, 0.6)");
        assert_eq!(with_opacity("#00cc96", 1.0), "rgba(0, 204, 150, 1)");
        assert_eq!(with_opacity("red", 0.5), "red");
        assert_eq!(with_opacity("#zzzzzz", 0.5), "#zzzzzz");
    }
}

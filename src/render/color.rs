//! Color definitions shared by the static and interactive maps.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveyError};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 { return None }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }

    /// Format as `#rrggbb`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const BLUE: Rgb = Rgb::new(0, 0, 255);
pub const LIME: Rgb = Rgb::new(0, 255, 0);
pub const DARK_ORANGE: Rgb = Rgb::new(255, 140, 0);
pub const LIGHT_GRAY: Rgb = Rgb::new(211, 211, 211);
/// 70 % grey.
pub const GRAY_70: Rgb = Rgb::new(179, 179, 179);

/// Fill colors for the flood area basemap, assigned to identifiers in sorted order.
pub const AREA_PALETTE: [Rgb; 36] = [
    Rgb::new(244, 164,  96), // sandybrown
    Rgb::new(255, 228, 196), // bisque
    Rgb::new(210, 180, 140), // tan
    Rgb::new(255, 228, 181), // moccasin
    Rgb::new(255, 250, 240), // floralwhite
    Rgb::new(255, 215,   0), // gold
    Rgb::new(189, 183, 107), // darkkhaki
    Rgb::new(250, 250, 210), // lightgoldenrodyellow
    Rgb::new(107, 142,  35), // olivedrab
    Rgb::new(127, 255,   0), // chartreuse
    Rgb::new(152, 251, 152), // palegreen
    Rgb::new(  0, 250, 154), // mediumspringgreen
    Rgb::new( 32, 178, 170), // lightseagreen
    Rgb::new(175, 238, 238), // paleturquoise
    Rgb::new(  0, 206, 209), // darkturquoise
    Rgb::new(  0, 191, 255), // deepskyblue
    Rgb::new(147, 112, 219), // mediumpurple
    Rgb::new(153,  50, 204), // darkorchid
    Rgb::new(221, 160, 221), // plum
    Rgb::new(191,   0, 191), // m
    Rgb::new(219, 112, 147), // palevioletred
    Rgb::new(211, 211, 211), // lightgray
    Rgb::new(240, 128, 128), // lightcoral
    Rgb::new(255, 228, 225), // mistyrose
    Rgb::new(255, 218, 185), // peachpuff
    Rgb::new(255, 222, 173), // navajowhite
    Rgb::new(255, 165,   0), // orange
    Rgb::new(255, 250, 205), // lemonchiffon
    Rgb::new(154, 205,  50), // yellowgreen
    Rgb::new(  0, 191, 191), // c
    Rgb::new(135, 206, 235), // skyblue
    Rgb::new(238, 130, 238), // violet
    Rgb::new(255,   0, 255), // fuchsia
    Rgb::new(205,  92,  92), // indianred
    Rgb::new(250, 128, 114), // salmon
    Rgb::new(191, 191,   0), // y
];

/// Assign palette colors to identifiers: sort, deduplicate, then index cyclically.
/// The mapping depends only on the set of identifiers, never on input order.
pub fn assign_palette<S: AsRef<str>>(ids: &[S], palette: &[Rgb]) -> Result<BTreeMap<String, Rgb>> {
    check_palette(palette)?;

    let mut sorted = ids.iter().map(|id| id.as_ref().to_string()).collect::<Vec<_>>();
    sorted.sort();
    sorted.dedup();

    Ok(sorted.into_iter()
        .enumerate()
        .map(|(i, id)| (id, palette[i % palette.len()]))
        .collect())
}

/// Like [`assign_palette`] for numeric identifiers, which sort by value rather than by text.
/// Returns `(id, color)` pairs in ascending id order.
pub fn assign_palette_numeric(ids: &[f64], palette: &[Rgb]) -> Result<Vec<(f64, Rgb)>> {
    check_palette(palette)?;

    let mut sorted = ids.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|a, b| a.total_cmp(b).is_eq());

    Ok(sorted.into_iter()
        .enumerate()
        .map(|(i, id)| (id, palette[i % palette.len()]))
        .collect())
}

fn check_palette(palette: &[Rgb]) -> Result<()> {
    if palette.is_empty() {
        return Err(SurveyError::Render("cannot assign colors from an empty palette".into()))
    }
    Ok(())
}

/// Qualitative color schemes used to color categorical attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheme {
    Accent,
    Dark2,
    Set1,
    Tab10,
    Tab20b,
}

impl Scheme {
    fn hex_colors(&self) -> &'static [&'static str] {
        match self {
            Scheme::Accent => &["#7fc97f", "#beaed4", "#fdc086", "#ffff99", "#386cb0", "#f0027f", "#bf5b17", "#666666"],
            Scheme::Dark2 => &["#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666"],
            Scheme::Set1 => &["#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf", "#999999"],
            Scheme::Tab10 => &[
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
                "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
            ],
            Scheme::Tab20b => &[
                "#393b79", "#5254a3", "#6b6ecf", "#9c9ede", "#637939",
                "#8ca252", "#b5cf6b", "#cedb9c", "#8c6d31", "#bd9e39",
                "#e7ba52", "#e7cb94", "#843c39", "#ad494a", "#d6616b",
                "#e7969c", "#7b4173", "#a55194", "#ce6dbd", "#de9ed6",
            ],
        }
    }

    /// All colors of the scheme, in order.
    pub fn colors(&self) -> Vec<Rgb> {
        self.hex_colors().iter().filter_map(|hex| Rgb::from_hex(hex)).collect()
    }

    /// `n` colors for `n` categories. With no more categories than colors, the scheme is
    /// resampled at `n` evenly spaced positions in `[0, 1]`, position `x` picking color
    /// `floor(x * len)` clamped to the last one. Cycled when there are more categories.
    pub fn sample(&self, n: usize) -> Vec<Rgb> {
        let colors = self.colors();
        let len = colors.len();
        match n {
            0 => Vec::new(),
            1 => vec![colors[0]],
            n if n <= len => (0..n)
                .map(|i| {
                    let x = i as f64 / (n - 1) as f64;
                    colors[((x * len as f64).floor() as usize).min(len - 1)]
                })
                .collect(),
            n => (0..n).map(|i| colors[i % len]).collect(),
        }
    }

    /// Color for each category, categories sorted.
    pub fn categorize<'a>(&self, categories: impl IntoIterator<Item = &'a String>) -> BTreeMap<String, Rgb> {
        let mut sorted = categories.into_iter().cloned().collect::<Vec<_>>();
        sorted.sort();
        sorted.dedup();
        let colors = self.sample(sorted.len());
        sorted.into_iter().zip(colors).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("FA{i:02}")).collect()
    }

    #[test]
    fn palette_assignment_is_one_to_one_when_sizes_match() {
        let palette = &AREA_PALETTE[..35];
        let colors = assign_palette(&ids(35), palette).unwrap();

        assert_eq!(colors.len(), 35);
        for (i, color) in colors.values().enumerate() {
            assert_eq!(*color, palette[i]);
        }
    }

    #[test]
    fn palette_assignment_wraps_around() {
        let palette = &AREA_PALETTE[..35];
        let colors = assign_palette(&ids(36), palette).unwrap();

        assert_eq!(colors["FA36"], palette[0]);
        assert_eq!(colors["FA01"], palette[0]);
        assert_eq!(colors["FA35"], palette[34]);
    }

    #[test]
    fn palette_assignment_ignores_input_order() {
        let mut shuffled = ids(12);
        shuffled.reverse();
        shuffled.swap(2, 7);
        shuffled.push("FA03".into());

        let a = assign_palette(&ids(12), &AREA_PALETTE).unwrap();
        let b = assign_palette(&shuffled, &AREA_PALETTE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_palette_is_an_error() {
        assert!(assign_palette(&ids(3), &[]).is_err());
        assert!(assign_palette_numeric(&[1.0], &[]).is_err());
    }

    #[test]
    fn numeric_identifiers_sort_by_value() {
        let ids = [10.0, 2.0, 1.0, 12.0, 2.0, 11.0];
        let colors = assign_palette_numeric(&ids, &AREA_PALETTE).unwrap();

        let order = colors.iter().map(|(id, _)| *id).collect::<Vec<_>>();
        assert_eq!(order, [1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(colors[2], (10.0, AREA_PALETTE[2]));
    }

    #[test]
    fn hex_parses_and_prints() {
        let rgb = Rgb::from_hex("#1b9e77").unwrap();
        assert_eq!(rgb, Rgb::new(0x1b, 0x9e, 0x77));
        assert_eq!(rgb.hex(), "#1b9e77");
        assert!(Rgb::from_hex("1b9e77").is_none());
        assert!(Rgb::from_hex("#1b9e7").is_none());
    }

    #[test]
    fn scheme_sampling_spans_the_scheme() {
        let colors = Scheme::Tab20b.colors();
        let two = Scheme::Tab20b.sample(2);
        assert_eq!(two, vec![colors[0], colors[19]]);

        let dark2 = Scheme::Dark2.colors();
        let five = Scheme::Dark2.sample(5);
        assert_eq!(five, vec![dark2[0], dark2[2], dark2[4], dark2[6], dark2[7]]);

        let many = Scheme::Accent.sample(10);
        assert_eq!(many.len(), 10);
        assert_eq!(many[8], many[0]);
    }

    #[test]
    fn categories_are_colored_in_sorted_order() {
        let categories = ["Rear".to_string(), "Front".to_string(), "Rear".to_string()];
        let colors = Scheme::Set1.categorize(&categories);
        let set1 = Scheme::Set1.colors();

        assert_eq!(colors.len(), 2);
        assert_eq!(colors["Front"], set1[0]);
        assert_eq!(colors["Rear"], set1[8]);
    }
}

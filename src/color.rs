use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Continuous colour scale (plasma)
// ---------------------------------------------------------------------------

/// Plasma stops, dark purple → yellow.
const PLASMA: [(u8, u8, u8); 10] = [
    (0x0d, 0x08, 0x87),
    (0x46, 0x03, 0x9f),
    (0x72, 0x01, 0xa8),
    (0x9c, 0x17, 0x9e),
    (0xbd, 0x37, 0x86),
    (0xd8, 0x57, 0x6b),
    (0xed, 0x79, 0x53),
    (0xfb, 0x9f, 0x3a),
    (0xfd, 0xca, 0x26),
    (0xf0, 0xf9, 0x21),
];

fn to_color32(c: LinSrgb) -> Color32 {
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(c).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Sample the plasma gradient at `t` in `[0, 1]` (clamped).
pub fn plasma(t: f64) -> Color32 {
    let stops: Vec<LinSrgb> = PLASMA
        .iter()
        .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
        .collect();

    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (stops.len() - 1) as f64;
    let i = (pos.floor() as usize).min(stops.len() - 2);
    let frac = (pos - i as f64) as f32;
    to_color32(stops[i].mix(stops[i + 1], frac))
}

// ---------------------------------------------------------------------------
// Value → colour mapping, binned into legend bands
// ---------------------------------------------------------------------------

/// One legend band of the scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
    pub color: Color32,
}

impl Band {
    pub fn label(&self) -> String {
        format!("Δ {:.5} – {:.5} AU", self.lo, self.hi)
    }
}

/// Maps uncertainty values onto `n` equal-width bands over `[lo, hi]`.
#[derive(Debug, Clone)]
pub struct ColorScale {
    lo: f64,
    hi: f64,
    bands: Vec<Band>,
}

impl ColorScale {
    pub const DEFAULT_BANDS: usize = 8;

    pub fn new(lo: f64, hi: f64, n: usize) -> Self {
        let n = n.max(1);
        let width = (hi - lo) / n as f64;
        let bands = (0..n)
            .map(|i| {
                // first band darkest, last band brightest
                let t = if n == 1 { 0.5 } else { i as f64 / (n - 1) as f64 };
                Band {
                    lo: lo + width * i as f64,
                    hi: if i + 1 == n { hi } else { lo + width * (i + 1) as f64 },
                    color: plasma(t),
                }
            })
            .collect();
        ColorScale { lo, hi, bands }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Index of the band a value falls into; out-of-range values clamp.
    pub fn band_of(&self, value: f64) -> usize {
        let n = self.bands.len();
        let span = self.hi - self.lo;
        if span <= 0.0 || !span.is_finite() || !value.is_finite() {
            return 0;
        }
        let idx = ((value - self.lo) / span * n as f64).floor();
        (idx.max(0.0) as usize).min(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plasma_endpoints() {
        assert_eq!(plasma(0.0), Color32::from_rgb(0x0d, 0x08, 0x87));
        assert_eq!(plasma(1.0), Color32::from_rgb(0xf0, 0xf9, 0x21));
        assert_eq!(plasma(-3.0), plasma(0.0));
        assert_eq!(plasma(f64::NAN), plasma(0.0));
    }

    #[test]
    fn bands_cover_the_range() {
        let scale = ColorScale::new(0.0, 0.008, 4);
        let bands = scale.bands();
        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0].lo, 0.0);
        assert_eq!(bands[3].hi, 0.008);
        assert_eq!(bands[1].label(), "Δ 0.00200 – 0.00400 AU");
    }

    #[test]
    fn values_map_to_bands() {
        let scale = ColorScale::new(-0.001, 0.003, 4);
        assert_eq!(scale.band_of(-0.001), 0);
        assert_eq!(scale.band_of(0.0005), 1);
        assert_eq!(scale.band_of(0.003), 3);
        assert_eq!(scale.band_of(1.0), 3);
        assert_eq!(scale.band_of(-5.0), 0);
        assert_eq!(scale.bands()[scale.band_of(0.003)].color, plasma(1.0));
    }

    #[test]
    fn degenerate_range_maps_to_first_band() {
        let scale = ColorScale::new(0.002, 0.002, 8);
        assert_eq!(scale.band_of(0.002), 0);
        assert_eq!(scale.band_of(0.5), 0);
    }
}

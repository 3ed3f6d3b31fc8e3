use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub hue_step: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            hue_step: 0.09,
            saturation: 0.4,
            value: 0.95,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PastelColor {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl PastelColor {
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        hsv_to_rgb(self.hue, self.saturation, self.value)
    }

    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

// Session-scoped palette: one random base hue per session, stepped per
// allocated category. Reset discards the base so the next session
// re-randomizes.
#[derive(Debug)]
pub struct ColorAllocator {
    rng: SmallRng,
    config: PaletteConfig,
    base_hue: Option<f32>,
    allocated: usize,
}

impl ColorAllocator {
    pub fn new(config: PaletteConfig) -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            config,
            base_hue: None,
            allocated: 0,
        }
    }

    pub fn seeded(config: PaletteConfig, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            config,
            base_hue: None,
            allocated: 0,
        }
    }

    pub fn allocate(&mut self) -> PastelColor {
        let base = match self.base_hue {
            Some(base) => base,
            None => {
                let base = self.rng.gen_range(0.0f32..1.0);
                self.base_hue = Some(base);
                base
            }
        };
        let hue = (base + self.allocated as f32 * self.config.hue_step).fract();
        self.allocated += 1;
        PastelColor {
            hue,
            saturation: self.config.saturation,
            value: self.config.value,
        }
    }

    pub fn reset(&mut self) {
        self.base_hue = None;
        self.allocated = 0;
    }

    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (u8, u8, u8) {
    let hue = hue.rem_euclid(1.0) * 6.0;
    let sector = hue.floor() as i32 % 6;
    let fraction = hue - hue.floor();

    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * fraction);
    let t = value * (1.0 - saturation * (1.0 - fraction));

    let (r, g, b) = match sector {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };

    (to_channel(r), to_channel(g), to_channel(b))
}

fn to_channel(unit: f32) -> u8 {
    (unit.clamp(0.0, 1.0) * 255.0).round() as u8
}

//! Look-ahead soft limiter with dual-path pre-emphasis.
//!
//! The limiter tracks two parallel signals per sample: a "fixed" path that is
//! hard-clipped to `level` up front, and a "variable" path that is whatever
//! remains after subtracting the fixed path. A trailing head pointer `h`,
//! `width/2` samples behind the write pointer `p`, looks ahead at the energy
//! about to be written and raises an attenuation envelope (shaped by a Hann
//! window) over the `width` samples centered on the peak, so a loud transient
//! is ducked slightly before it arrives rather than being clipped abruptly.

use satr_core::Real;
use satr_core::math::{cos, round};

use crate::fir::IntFir;

pub struct Limiter {
    level: i16,
    width: usize,
    shape: Vec<i16>,
    att: Vec<i16>,
    fix: Vec<i32>,
    var: Vec<i32>,
    p: usize,
    h: usize,
    vfir: Option<IntFir>,
    ffir: Option<IntFir>,
}

impl Limiter {
    /// `vtaps`/`ftaps` are the pre-emphasis FIR taps for the variable and
    /// fixed paths respectively; pass `None` to skip filtering a path.
    pub fn new(level: i16, width: usize, vtaps: Option<&[f64]>, ftaps: Option<&[f64]>) -> Self {
        let width = width | 1;

        let shape = (0..width)
            .map(|i| {
                let x = (1.0 - cos(2.0 * f64::PI / (width as f64 + 1.0) * (i as f64 + 1.0))) * 0.5 * i16::MAX as f64;
                round(x) as i16
            })
            .collect();

        Limiter {
            level,
            width,
            shape,
            att: vec![0i16; width],
            fix: vec![0i32; width],
            var: vec![0i32; width],
            p: 0,
            h: width / 2,
            vfir: vtaps.map(|t| IntFir::new(t, 1, 1, 0)),
            ffir: ftaps.map(|t| IntFir::new(t, 1, 1, 0)),
        }
    }

    /// Filters and limits `samples` values from `vin`/`fin` (the fixed input
    /// may be omitted, equivalent to a silent fixed path) into `out`.
    pub fn process(&mut self, out: &mut [i16], vin: &[i16], fin: Option<&[i16]>, samples: usize) {
        for i in 0..samples {
            self.var[self.p] = vin[i] as i32;
            self.fix[self.p] = fin.map(|f| f[i] as i32).unwrap_or(0);
            self.att[self.p] = 0;

            if let Some(vfir) = &mut self.vfir {
                let mut o = [0i32; 1];
                vfir.process_sample(self.var[self.p], &mut o);
                self.var[self.p] = o[0];
            }
            if let Some(ffir) = &mut self.ffir {
                let mut o = [0i32; 1];
                ffir.process_sample(self.fix[self.p], &mut o);
                self.fix[self.p] = o[0];
            }

            let level = self.level as i32;
            if self.fix[self.p] < -level {
                self.fix[self.p] = -level;
            } else if self.fix[self.p] > level {
                self.fix[self.p] = level;
            }

            self.var[self.p] -= self.fix[self.p];

            self.p += 1;
            if self.p == self.width {
                self.p = 0;
            }
            self.h += 1;
            if self.h == self.width {
                self.h = 0;
            }

            let mut a = (self.var[self.h] + self.fix[self.h]).abs();
            if a > level {
                let denom = self.var[self.h].abs();
                a = i16::MAX as i32 - (level + self.var[self.h].abs() - a) * i16::MAX as i32 / denom.max(1);

                for _ in 0..self.width {
                    let b = ((a as i64 * self.shape[self.p] as i64) >> 15) as i16;
                    if b > self.att[self.p] {
                        self.att[self.p] = b;
                    }
                    self.p += 1;
                    if self.p == self.width {
                        self.p = 0;
                    }
                }
            }

            let mut a = self.fix[self.p] as i64;
            a += (self.var[self.p] as i64 * (i16::MAX as i64 - self.att[self.p] as i64)) >> 15;

            let level = level as i64;
            if a < -level {
                a = -level;
            } else if a > level {
                a = level;
            }

            out[i] = a as i16;
        }
    }
}

//! MSK demodulator turning the AM-demodulated amplitude of a channel into one soft decision per
//! bit at 2400 bps. A local 1800 Hz oscillator brings the two MSK tones to +/-600 Hz, a matched
//! filter integrates over one bit and a phase loop keeps the oscillator on the carrier.

use std::f64::consts::PI;

use num::Complex;

use super::frame::Synchronizer;

const BAUD_RATE: u32 = 2_400;
const PLL_GAIN: f64 = 3.8e-3;


#[derive(Debug)]
pub struct Demod {
    channel_rate: u32,
    flen: usize,
    df:  f64,
    phi: f64,
    clk: f64,
    lvl: f64,
    s:   u32,
    idx: usize,
    h:   Vec<f64>,
    inb: Vec<Complex<f64>>,
}

impl Demod {

    pub fn new(channel_rate: u32) -> Demod {

        let flen = (channel_rate / (BAUD_RATE / 2)) as usize + 1;

        let mut h = vec![0.0; 2 * flen];
        let inb = vec![Complex::new(0.0, 0.0); flen];

        for i in 0..flen {

            let value = (2.0 * PI * 600.0 / channel_rate as f64 * (i as f64 - (flen / 2) as f64)).cos();

            h[i]        = value;
            h[i + flen] = value;
        }

        Demod {
            channel_rate,
            flen,
            df:  0.0,
            phi: 0.0,
            clk: 0.0,
            lvl: 0.0,
            s:   0,
            idx: 0,
            h,
            inb,
        }
    }

    /// Smoothed magnitude of the received carrier
    pub fn level(&self) -> f64 {
        self.lvl
    }

    /// Demodulates a block of amplitude samples, feeding every bit decision to `sync`
    pub fn demodulate(&mut self, samples: &[f64], sync: &mut Synchronizer) {

        for &input in samples {

            let s = 1800.0 / self.channel_rate as f64 * 2.0 * PI + self.df;
            self.phi += s;
            if self.phi >= 2.0 * PI { self.phi -= 2.0 * PI; }

            self.inb[self.idx] = Complex::new(
                input *  self.phi.cos(),
                input * -self.phi.sin()
            );
            self.idx = (self.idx + 1) % self.flen;

            self.clk += s;
            if self.clk >= 3.0 * PI / 2.0 {
                self.clk -= 3.0 * PI / 2.0;

                let mut o = self.flen - self.idx;
                let mut v = Complex::new(0.0, 0.0);
                for j in 0..self.flen {
                    v += self.h[o] * self.inb[j];
                    o += 1;
                }

                let lvl = v.norm();
                v /= lvl + 1e-6;
                self.lvl = 0.99 * self.lvl + 0.01 * lvl / 5.2;

                let (dphi, vo) = Demod::quadrature(self.s, v);

                sync.set_carrier(self.lvl);
                sync.put_bit(vo);

                // An inverted preamble means the bit phase is off by half a turn
                if sync.polarity_flipped() {
                    self.s ^= 2;
                }

                self.s = self.s.wrapping_add(1);
                self.df = PLL_GAIN * dphi;
            }
        }
    }

    /// Picks the rail carrying the current bit and its phase error
    fn quadrature(msk_s: u32, v: Complex<f64>) -> (f64, f64) {

        match msk_s & 3 {
            0 => (if v.re >= 0.0 {  v.im } else { -v.im },  v.re),
            1 => (if v.im >= 0.0 { -v.re } else {  v.re },  v.im),
            2 => (if v.re >= 0.0 {  v.im } else { -v.im }, -v.re),
            _ => (if v.im >= 0.0 { -v.re } else {  v.re }, -v.im),
        }
    }
}

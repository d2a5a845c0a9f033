//! Closed-form glottal flow waveforms.
//!
//! Each function maps a normalized phase time `t` in `[0, 1)` (one glottal
//! cycle) to an amplitude, given the model's shape parameters. `Oq` is the
//! open quotient (fraction of the cycle the glottis is open), `am` the
//! asymmetry between the opening and closing phases.

use std::f32::consts::{FRAC_PI_2, PI};

/// Sawtooth truncated at the open quotient: a linear fall while the
/// glottis is open, zero for the rest of the cycle.
#[inline]
pub fn cutoff_sawtooth(t: f32, oq: f32) -> f32 {
    if t < oq { 1.0 - t } else { 0.0 }
}

/// Rosenberg's type-C pulse: raised-cosine rise over `Oq * am`,
/// quarter-cosine fall over `Oq * (1 - am)`, closed otherwise.
/// Continuous everywhere, including at the cycle wrap.
#[inline]
pub fn rosenberg_c(t: f32, oq: f32, am: f32) -> f32 {
    let tp = oq * am;
    let tn = oq * (1.0 - am);

    if t <= tp {
        0.5 * (1.0 - (PI * t / tp).cos())
    } else if t <= tp + tn {
        (FRAC_PI_2 * (t - tp) / tn).cos()
    } else {
        0.0
    }
}

/// KLGLOTT88 flow pulse: cubic polynomial while open, zero after `Oq`.
#[inline]
pub fn klglott88(t: f32, oq: f32) -> f32 {
    if t <= oq {
        let r = t / oq;
        r * r - r * r * r
    } else {
        0.0
    }
}

/// Liljencrants-Fant flow derivative.
///
/// Exponentially growing sinusoid up to the excitation instant `te = Oq`,
/// exponential return phase afterwards. The return-phase time constant is
/// refined with a few Newton steps; the whole evaluation runs in f64
/// because the refinement loses too much precision in f32.
pub fn liljencrants_fant(t: f32, oq: f32, am: f32) -> f32 {
    use std::f64::consts::PI;

    let t = t as f64;
    // p1 = Te, p2 = Ug'(Te) / Ee, p3 = 1 - Tp / Te
    let p1 = oq as f64;
    let p2 = 0.1;
    let p3 = 1.0 - am as f64;

    let te = p1;
    let mtc = te - 1.0;
    let wa = PI / (te * (1.0 - p3));

    let a = -(-p2 * (wa * te).sin()).ln() / te;

    // Peak flow Up fixed at 1; e0 scales the open phase accordingly.
    let up = 1.0;
    let e0 = up / ((wa * (a * PI / wa).exp() + 1.0) / (a * a + wa * wa));

    let int_a = e0 * ((wa / (wa * te).tan() - a) / p2 + wa) / (a * a + wa * wa);

    // Newton refinement of the return-phase time constant rb = 1 / eps.
    let rb0 = p2 * int_a;
    let mut rb = rb0;
    for _ in 0..4 {
        let kk = 1.0 - (mtc / rb).exp();
        let err = rb + mtc * (1.0 / kk - 1.0) - rb0;
        let d_err = 1.0 - (1.0 - kk) * (mtc / rb / kk).powi(2);
        rb -= err / d_err;
    }

    let e1 = 1.0 / (p2 * (1.0 - (mtc / rb).exp()));

    let y = if t < te {
        e0 * ((a * t).exp() * (a * (wa * t).sin() - wa * (wa * t).cos()) + wa)
            / (a * a + wa * wa)
    } else {
        e1 * ((mtc / rb).exp() * (t - 1.0 - rb) + ((te - t) / rb).exp() * rb)
    };

    y as f32
}

//! Column-aligned text rendering for [`NdArray`].
//!
//! Output follows the familiar `array([...])` layout: one scan over all
//! logical elements fixes four column widths (sign+integer and fraction,
//! separately for the real and imaginary parts), every element is printed
//! against those widths, axes longer than the per-axis limit are truncated
//! around an ellipsis, nested axes indent one space per level, and
//! top-level blocks are separated by a blank line.
//!
//! Real fractions print truncated raw digits; imaginary fractions print
//! rounded digits followed by `j` and space padding, so columns stay
//! aligned across mixed integral and fractional entries.

use std::fmt;

use crate::complex::{c64, Complex64};
use crate::ndarray::NdArray;

#[derive(Debug, Default)]
struct FormatParams {
    int_width: usize,
    frac_width: usize,
    imag_int_width: usize,
    imag_frac_width: usize,
}

fn round_to(x: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (x * scale).round() / scale
}

/// Number of digits after the decimal point in the shortest rendering.
fn frac_digits(x: f64) -> usize {
    let s = format!("{x}");
    match s.find('.') {
        Some(dot) => s.len() - dot - 1,
        None => 0,
    }
}

/// Decimal digit characters of a fraction in `[0, 1)`, e.g. `0.25 -> "25"`.
fn frac_chars(x: f64) -> String {
    let s = format!("{x}");
    match s.find('.') {
        Some(dot) => s[dot + 1..].to_string(),
        None => String::new(),
    }
}

fn int_chars(x: f64) -> String {
    format!("{x}")
}

fn pad_start(s: &str, width: usize) -> String {
    format!("{s:>width$}")
}

fn pad_end(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

fn indent_lines(s: &str, n: usize) -> String {
    let prefix = " ".repeat(n);
    s.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn blank_out_whitespace_lines(s: &str) -> String {
    s.lines()
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

impl NdArray {
    fn format_params(&self, precision: usize) -> FormatParams {
        let mut p = FormatParams::default();
        for z in self.iter() {
            let sign = usize::from(z.re < 0.0);
            let re_int = z.re.abs().floor();
            let re_frac = z.re.abs() - re_int;
            let im_int = z.im.abs().floor();
            let im_frac = z.im.abs() - im_int;

            if re_frac != 0.0 {
                let digits = frac_digits(round_to(re_frac, precision)).min(precision);
                p.frac_width = p.frac_width.max(digits);
            }
            p.int_width = p.int_width.max(sign + int_chars(re_int).len());

            if im_frac != 0.0 {
                if p.imag_int_width == 0 {
                    p.imag_int_width = 1;
                }
                let digits = frac_digits(round_to(im_frac, precision)).min(precision);
                p.imag_frac_width = p.imag_frac_width.max(digits);
            }
            if im_int != 0.0 {
                p.imag_int_width = p.imag_int_width.max(int_chars(im_int).len());
            }
        }
        p
    }

    fn format_element(&self, z: Complex64, p: &FormatParams) -> String {
        let mut out = String::new();
        let sign = if z.re < 0.0 { "-" } else { "" };
        let re_int = z.re.abs().floor();
        let re_frac = z.re.abs() - re_int;
        let im_int = z.im.abs().floor();
        let im_frac = z.im.abs() - im_int;

        out.push_str(&pad_start(
            &format!("{sign}{}", int_chars(re_int)),
            p.int_width,
        ));
        if p.frac_width > 0 || (p.imag_int_width > 0 && p.imag_frac_width > 0) {
            out.push('.');
            if re_frac != 0.0 {
                let mut digits = frac_chars(re_frac);
                digits.truncate(p.frac_width);
                out.push_str(&pad_end(&digits, p.frac_width));
            } else {
                out.push_str(&" ".repeat(p.frac_width));
            }
        }
        if p.imag_int_width > 0 {
            out.push(if z.im < 0.0 { '-' } else { '+' });
            out.push_str(&pad_start(&int_chars(im_int), p.imag_int_width));
            if p.imag_frac_width > 0 {
                out.push('.');
                if im_frac != 0.0 {
                    let digits = frac_chars(round_to(im_frac, p.imag_frac_width));
                    out.push_str(&pad_end(&format!("{digits}j"), p.imag_frac_width + 1));
                } else {
                    out.push('j');
                    out.push_str(&" ".repeat(p.imag_frac_width));
                }
            } else {
                out.push('j');
            }
        }
        out
    }

    fn block_string(&self, max_per_axis: usize, p: &FormatParams) -> String {
        if self.rank() == 0 {
            let s = self.store.borrow();
            return self.format_element(c64(s.re[self.offset], s.im[self.offset]), p);
        }
        let dim = self.shape[0];
        let (separator, trunc) = if self.rank() == 1 {
            (", ".to_string(), "...")
        } else {
            (format!(",{}", "\n".repeat(self.rank() - 1)), " ...")
        };
        let item = |i: usize| -> String {
            if self.rank() == 1 {
                let s = self.store.borrow();
                let pos = self.offset + i * self.strides[0];
                self.format_element(c64(s.re[pos], s.im[pos]), p)
            } else {
                let sub = Self {
                    shape: self.shape[1..].to_vec(),
                    strides: self.strides[1..].to_vec(),
                    offset: self.offset + i * self.strides[0],
                    store: std::rc::Rc::clone(&self.store),
                };
                let s = indent_lines(&sub.block_string(max_per_axis, p), 1);
                if i == 0 {
                    s.trim_start().to_string()
                } else {
                    s
                }
            }
        };

        let mut out = String::from("[");
        if dim <= max_per_axis {
            for i in 0..dim {
                out.push_str(&item(i));
                if i != dim - 1 {
                    out.push_str(&separator);
                }
            }
        } else {
            let shown = max_per_axis / 2;
            for i in 0..shown {
                out.push_str(&item(i));
                out.push_str(&separator);
            }
            out.push_str(trunc);
            out.push_str(&separator);
            for i in dim - shown..dim {
                out.push_str(&item(i));
                if i != dim - 1 {
                    out.push_str(&separator);
                }
            }
        }
        out.push(']');
        out
    }

    /// Bracketed text rendering with explicit truncation and precision.
    pub fn render(&self, max_per_axis: usize, precision: usize) -> String {
        let p = self.format_params(precision);
        blank_out_whitespace_lines(&self.block_string(max_per_axis, &p))
    }
}

impl fmt::Display for NdArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.format_params(4);
        let body = indent_lines(&self.block_string(6, &p), 6);
        let wrapped = format!("array({})", body.trim_start());
        f.write_str(&blank_out_whitespace_lines(&wrapped))
    }
}

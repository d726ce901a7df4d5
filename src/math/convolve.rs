//! 1-D discrete convolution.

use std::fmt;
use std::str::FromStr;

use num_traits::Zero;

use crate::complex::Complex64;
use crate::ndarray::NdArray;
use crate::{NumkError, Result};

/// Output sizing of [`convolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolveMode {
    /// Every overlap, length `n + m - 1`.
    Full,
    /// Centered to the longer input, length `max(n, m)`.
    Same,
    /// Complete overlaps only, length `|n - m| + 1`.
    Valid,
}

impl FromStr for ConvolveMode {
    type Err = NumkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(ConvolveMode::Full),
            "same" => Ok(ConvolveMode::Same),
            "valid" => Ok(ConvolveMode::Valid),
            other => Err(NumkError::UnknownConvolveMode(other.to_string())),
        }
    }
}

impl fmt::Display for ConvolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConvolveMode::Full => "full",
            ConvolveMode::Same => "same",
            ConvolveMode::Valid => "valid",
        })
    }
}

/// Discrete convolution of two rank-1 arrays.
///
/// # Errors
/// Fails with [`NumkError::NotOneDimensional`] on higher-rank input and
/// [`NumkError::EmptyConvolution`] when either input has no elements.
pub fn convolve(a: &NdArray, v: &NdArray, mode: ConvolveMode) -> Result<NdArray> {
    if a.rank() != 1 {
        return Err(NumkError::NotOneDimensional(a.rank()));
    }
    if v.rank() != 1 {
        return Err(NumkError::NotOneDimensional(v.rank()));
    }
    let n = a.shape()[0];
    let m = v.shape()[0];
    if n == 0 || m == 0 {
        return Err(NumkError::EmptyConvolution);
    }

    let xs: Vec<Complex64> = a.iter().collect();
    let ys: Vec<Complex64> = v.iter().collect();
    let (longer, shorter) = if n >= m { (&xs, &ys) } else { (&ys, &xs) };

    let full = n + m - 1;
    let out_len = match mode {
        ConvolveMode::Full => full,
        ConvolveMode::Same => n.max(m),
        ConvolveMode::Valid => n.max(m) - n.min(m) + 1,
    };
    let out_offset = match mode {
        ConvolveMode::Full => 0,
        ConvolveMode::Same => (full - n.min(m)) / 2,
        ConvolveMode::Valid => full - n.min(m),
    };

    let mut acc = vec![Complex64::zero(); out_len];
    for (i, &x) in longer.iter().enumerate() {
        for (j, &y) in shorter.iter().enumerate() {
            let Some(idx) = (i + j).checked_sub(out_offset) else {
                continue;
            };
            if idx >= out_len {
                continue;
            }
            acc[idx] += x * y;
        }
    }
    Ok(NdArray::of(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convolve_fixture() {
        let a = NdArray::of(&[1.0, 2.0, 3.0]);
        let v = NdArray::of(&[0.0, 1.0, 0.5]);
        assert_eq!(
            convolve(&a, &v, ConvolveMode::Full).unwrap(),
            NdArray::of(&[0.0, 1.0, 2.5, 4.0, 1.5])
        );
        assert_eq!(
            convolve(&a, &v, ConvolveMode::Same).unwrap(),
            NdArray::of(&[1.0, 2.5, 4.0])
        );
        assert_eq!(
            convolve(&a, &v, ConvolveMode::Valid).unwrap(),
            NdArray::of(&[2.5])
        );
    }

    #[test]
    fn test_convolve_is_commutative_in_length() {
        let a = NdArray::of(&[1.0, 2.0]);
        let v = NdArray::of(&[0.5, 1.0, 2.0, 4.0]);
        assert_eq!(
            convolve(&a, &v, ConvolveMode::Full).unwrap(),
            convolve(&v, &a, ConvolveMode::Full).unwrap()
        );
        assert_eq!(
            convolve(&a, &v, ConvolveMode::Same).unwrap().shape(),
            &[4]
        );
        assert_eq!(
            convolve(&a, &v, ConvolveMode::Valid).unwrap().shape(),
            &[3]
        );
    }

    #[test]
    fn test_convolve_rank_checks() {
        let a = NdArray::zeros(&[2, 2]);
        let v = NdArray::zeros(&[2]);
        assert!(matches!(
            convolve(&a, &v, ConvolveMode::Full),
            Err(NumkError::NotOneDimensional(2))
        ));
        assert!(matches!(
            convolve(&v, &NdArray::zeros(&[0]), ConvolveMode::Full),
            Err(NumkError::EmptyConvolution)
        ));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("full".parse::<ConvolveMode>().unwrap(), ConvolveMode::Full);
        assert_eq!("same".parse::<ConvolveMode>().unwrap(), ConvolveMode::Same);
        assert_eq!(
            "valid".parse::<ConvolveMode>().unwrap(),
            ConvolveMode::Valid
        );
        assert!(matches!(
            "circular".parse::<ConvolveMode>(),
            Err(NumkError::UnknownConvolveMode(_))
        ));
        assert_eq!(ConvolveMode::Same.to_string(), "same");
    }
}

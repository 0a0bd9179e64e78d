//! Grid topology discriminator.

use crate::error::GridError;

/// Grid style as stored in the geometry header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GridStyle {
    /// Regular tensor-product grid.
    #[default]
    Regular,
    /// Oct-tree refinement. Reserved.
    Octree,
    /// Layered AMR refinement. Reserved.
    Layered,
}

impl GridStyle {
    /// Header code: 0, 1 or 10.
    pub const fn code(self) -> i64 {
        match self {
            Self::Regular => 0,
            Self::Octree => 1,
            Self::Layered => 10,
        }
    }

    /// Whether this style can be written and read.
    pub const fn is_implemented(self) -> bool {
        matches!(self, Self::Regular)
    }

    /// Decode a header code, rejecting every style that is not implemented.
    pub fn from_code(style: i64) -> Result<Self, GridError> {
        match style {
            0 => Ok(Self::Regular),
            _ => Err(GridError::UnsupportedGridStyle { style }),
        }
    }

    /// Fail unless this style is implemented.
    pub fn ensure_implemented(self) -> Result<(), GridError> {
        if self.is_implemented() {
            Ok(())
        } else {
            Err(GridError::UnsupportedGridStyle { style: self.code() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_styles_fail_loudly() {
        for style in [GridStyle::Octree, GridStyle::Layered] {
            assert!(matches!(
                style.ensure_implemented(),
                Err(GridError::UnsupportedGridStyle { .. })
            ));
            assert!(GridStyle::from_code(style.code()).is_err());
        }
        assert_eq!(GridStyle::from_code(0).unwrap(), GridStyle::Regular);
        assert!(matches!(
            GridStyle::from_code(7),
            Err(GridError::UnsupportedGridStyle { style: 7 })
        ));
    }
}

//! Header-to-column resolution.

use crate::schema::Layout;
use crate::{Error, Result};
use csv::StringRecord;

/// Maps each position of an input header to a column of a layout.
///
/// Built once per decode call. Every header name must name a column;
/// columns the header leaves out are never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMapping {
    targets: Vec<usize>,
}

impl HeaderMapping {
    /// Resolves `header` against the columns of `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHeader`] for the first name that matches no
    /// column, or [`Error::DuplicateHeader`] if two names match the same
    /// column.
    pub fn resolve<L: Layout + ?Sized>(layout: &L, header: &StringRecord) -> Result<Self> {
        let mut claimed = vec![false; layout.len()];
        let mut targets = Vec::with_capacity(header.len());

        for name in header {
            let index = layout.position(name).ok_or_else(|| Error::UnknownHeader {
                header: name.to_string(),
            })?;
            if std::mem::replace(&mut claimed[index], true) {
                return Err(Error::DuplicateHeader {
                    header: name.to_string(),
                });
            }
            targets.push(index);
        }

        Ok(Self { targets })
    }

    /// Column index fed by header position `position`.
    #[must_use]
    pub fn target(&self, position: usize) -> Option<usize> {
        self.targets.get(position).copied()
    }

    /// Number of header positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns whether the header was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// `(header position, column index)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets.iter().copied().enumerate()
    }
}

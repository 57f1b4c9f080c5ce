use std::fmt;

use super::Hyperplane;
use crate::format::real;

/// Text form of a hyperplane: `[label] n_0 .. n_{d-1}[offset_label] offset\n`.
///
/// Each real is written as C `%g` preceded by one space. With an offset label
/// the label is written right after the last coordinate, then a space and the
/// offset.
#[derive(Clone, Copy, Debug)]
pub struct PrintHyperplane<'p> {
    hyperplane: &'p Hyperplane<'p>,
    label: Option<&'p str>,
    offset_label: Option<&'p str>,
}

impl<'p> PrintHyperplane<'p> {
    pub(super) fn new(
        hyperplane: &'p Hyperplane<'p>,
        label: Option<&'p str>,
        offset_label: Option<&'p str>,
    ) -> Self {
        Self {
            hyperplane,
            label,
            offset_label,
        }
    }
}

impl fmt::Display for PrintHyperplane<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = self.label {
            f.write_str(label)?;
        }
        for &c in self.hyperplane.coordinates() {
            write!(f, " {}", real(c))?;
        }
        let offset = real(self.hyperplane.offset());
        match self.offset_label {
            Some(label) => writeln!(f, "{label} {offset}"),
            None => writeln!(f, " {offset}"),
        }
    }
}

impl fmt::Display for Hyperplane<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.print(None, None), f)
    }
}

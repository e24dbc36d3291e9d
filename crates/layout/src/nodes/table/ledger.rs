//! Resolved borders for every grid line of a table fragment.
//!
//! `horizontal[line][col]` holds the border along the top of row `line` (line `rows`
//! is the bottom edge), `vertical[line][row]` the border along the left of column
//! `line`. `None` means the segment is undetermined or has no border.

use tabula_style::Border;

/// Outcome of offering a border for a ledger slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The offered border is now stored in the slot.
    Replaced,
    /// The slot kept its previous, at least as wide, border.
    Kept(Option<Border>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderLedger {
    horizontal: Vec<Vec<Option<Border>>>,
    vertical: Vec<Vec<Option<Border>>>,
}

impl BorderLedger {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            horizontal: vec![vec![None; columns]; rows + 1],
            vertical: vec![vec![None; rows]; columns + 1],
        }
    }

    fn resolve(slot: &mut Option<Border>, border: Option<Border>) -> Resolution {
        match (*slot, border) {
            (None, _) => {
                *slot = border;
                Resolution::Replaced
            }
            (Some(current), Some(offered)) if current.width < offered.width => {
                *slot = Some(offered);
                Resolution::Replaced
            }
            (current, _) => Resolution::Kept(current),
        }
    }

    /// Offers `border` for a horizontal slot. Only an empty slot or a strictly
    /// wider border replaces what is there.
    pub fn resolve_horizontal(&mut self, line: usize, col: usize, border: Option<Border>) -> Resolution {
        Self::resolve(&mut self.horizontal[line][col], border)
    }

    pub fn resolve_vertical(&mut self, line: usize, row: usize, border: Option<Border>) -> Resolution {
        Self::resolve(&mut self.vertical[line][row], border)
    }

    pub fn set_horizontal(&mut self, line: usize, col: usize, border: Option<Border>) {
        self.horizontal[line][col] = border;
    }

    pub fn set_vertical(&mut self, line: usize, row: usize, border: Option<Border>) {
        self.vertical[line][row] = border;
    }

    pub fn horizontal(&self, line: usize) -> &[Option<Border>] {
        self.horizontal.get(line).map_or(&[], Vec::as_slice)
    }

    pub fn vertical(&self, line: usize) -> &[Option<Border>] {
        self.vertical.get(line).map_or(&[], Vec::as_slice)
    }

    pub fn horizontal_lines(&self) -> usize {
        self.horizontal.len()
    }

    pub fn vertical_lines(&self) -> usize {
        self.vertical.len()
    }

    /// The ledger of the first `rows` rows: horizontal lines `0..=rows` and the
    /// first `rows` entries of every vertical line.
    pub fn slice(&self, rows: usize) -> Self {
        Self {
            horizontal: self.horizontal.iter().take(rows + 1).cloned().collect(),
            vertical: self
                .vertical
                .iter()
                .map(|line| line.iter().take(rows).copied().collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_types::Color;

    fn b(width: f32) -> Option<Border> {
        Some(Border::solid(width, Color::BLACK))
    }

    #[test]
    fn resolving_keeps_the_widest_border() {
        let mut ledger = BorderLedger::new(2, 2);
        assert_eq!(ledger.resolve_horizontal(1, 0, b(1.0)), Resolution::Replaced);
        assert_eq!(ledger.resolve_horizontal(1, 0, b(3.0)), Resolution::Replaced);
        assert_eq!(ledger.resolve_horizontal(1, 0, b(2.0)), Resolution::Kept(b(3.0)));
        assert_eq!(ledger.horizontal(1)[0], b(3.0));
    }

    #[test]
    fn absent_border_never_wins() {
        let mut ledger = BorderLedger::new(1, 1);
        assert_eq!(ledger.resolve_vertical(0, 0, None), Resolution::Replaced);
        assert_eq!(ledger.resolve_vertical(0, 0, b(0.5)), Resolution::Replaced);
        assert_eq!(ledger.resolve_vertical(0, 0, None), Resolution::Kept(b(0.5)));
        assert_eq!(ledger.vertical(0)[0], b(0.5));
    }

    #[test]
    fn equal_width_keeps_first_border() {
        let mut ledger = BorderLedger::new(1, 1);
        let red = Some(Border::solid(1.0, Color::rgb(255, 0, 0)));
        ledger.resolve_horizontal(0, 0, red);
        assert_eq!(ledger.resolve_horizontal(0, 0, b(1.0)), Resolution::Kept(red));
    }

    #[test]
    fn slice_truncates_both_axes() {
        let mut ledger = BorderLedger::new(4, 3);
        ledger.set_vertical(3, 1, b(2.0));
        let slice = ledger.slice(2);
        assert_eq!(slice.horizontal_lines(), 3);
        assert_eq!(slice.vertical_lines(), 4);
        assert_eq!(slice.vertical(3), &[None, b(2.0)]);
        assert!(slice.horizontal(5).is_empty());
    }
}

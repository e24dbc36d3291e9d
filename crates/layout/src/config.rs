#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Epsilon used when deciding whether content fits and whether a fragment has any
    /// visible geometry.
    ///
    /// Defaults to `1e-4`.
    pub float_tolerance: f32,
    /// Enables the trial that drops a reserved footer when every remaining row fits
    /// without it. Only consulted for complete tables that skip their last footer.
    ///
    /// Defaults to `true`.
    pub allow_footer_omission: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            float_tolerance: 1e-4,
            allow_footer_omission: true,
        }
    }
}

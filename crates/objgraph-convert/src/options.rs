//! Conversion behavior toggles.

/// Optional behaviors of a conversion pass. The defaults match the standard
/// encoding; callers override individual fields as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Mirror each object value as a structured blob on its node, and keep
    /// the mirror current on later passes. Enables fast denormalized reads
    /// and ancestor propagation at the cost of duplicated data.
    pub mirror_object_values: bool,
    /// Skip properties holding unsupported values (nulls) with a warning
    /// diagnostic instead of failing the whole pass.
    pub skip_unsupported: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        ConverterOptions {
            mirror_object_values: true,
            skip_unsupported: true,
        }
    }
}

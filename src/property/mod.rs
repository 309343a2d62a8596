// Property store: serialized attribute bags and the schema the editor reads from them.
pub mod color;
pub mod content;
pub mod descriptor;
pub mod value;

pub use color::Color;
pub use content::{Attribute, SerializedContent};
pub use descriptor::{MeasurementUnit, PropertyChoice, PropertyDescriptor, PropertyType};

use crate::error::PropertyError;

/// A configuration that exposes its fields to the host as string properties.
pub trait Configurable {
    fn properties(&self) -> Vec<PropertyDescriptor>;

    /// Applies one property edit. On error the configuration is unchanged.
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError>;

    /// Host-facing form of [`Configurable::set_property`]: `false` means the edit was rejected.
    fn update_property(&mut self, name: &str, value: &str) -> bool {
        match self.set_property(name, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("rejected property update {name}={value:?}: {e}");
                false
            }
        }
    }
}

//! Per-property attribute flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Flags controlling how a named property may be used.
    ///
    /// Equality is bitwise, so two attribute sets compare equal exactly when
    /// the same flags are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::PropertyAttributes;
    ///
    /// let attrs = PropertyAttributes::WRITABLE | PropertyAttributes::ENUMERABLE;
    /// assert!(attrs.is_writable());
    /// assert!(!attrs.is_configurable());
    /// assert_eq!(PropertyAttributes::FULL_ACCESS, attrs | PropertyAttributes::CONFIGURABLE);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PropertyAttributes: u8 {
        /// The value can be reassigned.
        const WRITABLE = 1 << 0;
        /// The property shows up during enumeration.
        const ENUMERABLE = 1 << 1;
        /// The property can be deleted and its attributes redefined.
        const CONFIGURABLE = 1 << 2;

        /// Read-only, hidden and permanent.
        const SEALED = 0;
        /// Writable and configurable but hidden from enumeration.
        const NON_ENUMERABLE = Self::WRITABLE.bits() | Self::CONFIGURABLE.bits();
        /// Every flag set; what a plain assignment creates.
        const FULL_ACCESS = Self::WRITABLE.bits() | Self::ENUMERABLE.bits() | Self::CONFIGURABLE.bits();
    }
}

impl PropertyAttributes {
    /// Returns true if the value can be reassigned.
    pub fn is_writable(self) -> bool {
        self.contains(Self::WRITABLE)
    }

    /// Returns true if the property is visible to enumeration.
    pub fn is_enumerable(self) -> bool {
        self.contains(Self::ENUMERABLE)
    }

    /// Returns true if the property can be deleted or redefined.
    pub fn is_configurable(self) -> bool {
        self.contains(Self::CONFIGURABLE)
    }
}

impl Default for PropertyAttributes {
    fn default() -> Self {
        Self::FULL_ACCESS
    }
}

//! Attribute codes such as `RW` or `W1C` and their IP-XACT meaning.

/// Predefined access rights.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Read access is permitted. Write operations have an undefined result.
    ReadOnly,
    /// Read operations have an undefined result. Write access is permitted.
    WriteOnly,
    /// Read and write accesses are permitted. Writes affect the state of the
    /// register and reads return the register value.
    ReadWrite,
    /// Read operations have an undefined result. Only the first write access
    /// after a reset will have an effect on the content.
    WriteOnce,
    /// Read access is always permitted. Only the first write access after a
    /// reset will have an effect on the content.
    ReadWriteOnce,
}

/// Effect of a write on the field value.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifiedWrite {
    /// Writing a one clears the corresponding bit.
    OneToClear,
    /// Writing a one sets the corresponding bit.
    OneToSet,
    /// Writing a one toggles the corresponding bit.
    OneToToggle,
    /// Writing a zero clears the corresponding bit.
    ZeroToClear,
    /// Writing a zero sets the corresponding bit.
    ZeroToSet,
    /// Writing a zero toggles the corresponding bit.
    ZeroToToggle,
    /// Any write clears the field.
    Clear,
    /// Any write sets the field.
    Set,
}

/// Side effect of a read on the field value.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadAction {
    /// The field is cleared after a read.
    Clear,
    /// The field is set after a read.
    Set,
}

/// Outcome of looking up one category of an attribute code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lookup<T> {
    /// The code defines this property.
    Value(T),
    /// The code is known and leaves this property unset.
    Unset,
    /// The code is not in the vocabulary.
    Unknown,
}

/// Decoded attribute code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// Access rights.
    pub access: Lookup<Access>,
    /// Write side effect.
    pub modified_write: Lookup<ModifiedWrite>,
    /// Read side effect.
    pub read_action: Lookup<ReadAction>,
}

/// Maps attribute codes to access properties.
pub trait AttributeDecoder {
    /// Decodes `code`. Must be total: unrecognized codes yield
    /// [`Lookup::Unknown`] rather than failing.
    fn decode(&self, code: &str) -> Attribute;
}

/// UVM-style attribute codes (`RO`, `RW`, `W1C`, `WRC`, ...).
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardCodes;

impl<T> Lookup<T> {
    /// Returns the value, if any.
    pub fn value(self) -> Option<T> {
        match self {
            Lookup::Value(value) => Some(value),
            Lookup::Unset | Lookup::Unknown => None,
        }
    }

    /// Returns `true` for [`Lookup::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, Lookup::Unknown)
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::Unset, Lookup::Value)
    }
}

impl Attribute {
    /// Attribute with every property unset.
    pub const UNSET: Self =
        Self { access: Lookup::Unset, modified_write: Lookup::Unset, read_action: Lookup::Unset };

    /// Attribute with every property unknown.
    pub const UNKNOWN: Self = Self {
        access: Lookup::Unknown,
        modified_write: Lookup::Unknown,
        read_action: Lookup::Unknown,
    };

    fn known(
        access: Access,
        modified_write: Option<ModifiedWrite>,
        read_action: Option<ReadAction>,
    ) -> Self {
        Self {
            access: Lookup::Value(access),
            modified_write: modified_write.into(),
            read_action: read_action.into(),
        }
    }
}

impl AttributeDecoder for StandardCodes {
    fn decode(&self, code: &str) -> Attribute {
        use self::{Access::*, ModifiedWrite as W, ReadAction as R};
        let code = code.trim().to_ascii_uppercase();
        match code.as_str() {
            "" => Attribute::UNSET,
            "RO" => Attribute::known(ReadOnly, None, None),
            "RW" => Attribute::known(ReadWrite, None, None),
            "WO" => Attribute::known(WriteOnly, None, None),
            "W1" => Attribute::known(ReadWriteOnce, None, None),
            "WO1" => Attribute::known(WriteOnce, None, None),
            "RC" => Attribute::known(ReadOnly, None, Some(R::Clear)),
            "RS" => Attribute::known(ReadOnly, None, Some(R::Set)),
            "WRC" => Attribute::known(ReadWrite, None, Some(R::Clear)),
            "WRS" => Attribute::known(ReadWrite, None, Some(R::Set)),
            "WC" => Attribute::known(ReadWrite, Some(W::Clear), None),
            "WS" => Attribute::known(ReadWrite, Some(W::Set), None),
            "WSRC" => Attribute::known(ReadWrite, Some(W::Set), Some(R::Clear)),
            "WCRS" => Attribute::known(ReadWrite, Some(W::Clear), Some(R::Set)),
            "W1C" => Attribute::known(ReadWrite, Some(W::OneToClear), None),
            "W1S" => Attribute::known(ReadWrite, Some(W::OneToSet), None),
            "W1T" => Attribute::known(ReadWrite, Some(W::OneToToggle), None),
            "W0C" => Attribute::known(ReadWrite, Some(W::ZeroToClear), None),
            "W0S" => Attribute::known(ReadWrite, Some(W::ZeroToSet), None),
            "W0T" => Attribute::known(ReadWrite, Some(W::ZeroToToggle), None),
            "W1SRC" => Attribute::known(ReadWrite, Some(W::OneToSet), Some(R::Clear)),
            "W1CRS" => Attribute::known(ReadWrite, Some(W::OneToClear), Some(R::Set)),
            "W0SRC" => Attribute::known(ReadWrite, Some(W::ZeroToSet), Some(R::Clear)),
            "W0CRS" => Attribute::known(ReadWrite, Some(W::ZeroToClear), Some(R::Set)),
            "WOC" => Attribute::known(WriteOnly, Some(W::Clear), None),
            "WOS" => Attribute::known(WriteOnly, Some(W::Set), None),
            _ => Attribute::UNKNOWN,
        }
    }
}

impl Access {
    /// Returns the IP-XACT spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Access::ReadOnly => "read-only",
            Access::WriteOnly => "write-only",
            Access::ReadWrite => "read-write",
            Access::WriteOnce => "writeOnce",
            Access::ReadWriteOnce => "read-writeOnce",
        }
    }
}

impl ModifiedWrite {
    /// Returns the IP-XACT spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            ModifiedWrite::OneToClear => "oneToClear",
            ModifiedWrite::OneToSet => "oneToSet",
            ModifiedWrite::OneToToggle => "oneToToggle",
            ModifiedWrite::ZeroToClear => "zeroToClear",
            ModifiedWrite::ZeroToSet => "zeroToSet",
            ModifiedWrite::ZeroToToggle => "zeroToToggle",
            ModifiedWrite::Clear => "clear",
            ModifiedWrite::Set => "set",
        }
    }
}

impl ReadAction {
    /// Returns the IP-XACT spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            ReadAction::Clear => "clear",
            ReadAction::Set => "set",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_case_insensitively() {
        let attribute = StandardCodes.decode(" w1c ");
        assert_eq!(attribute.access, Lookup::Value(Access::ReadWrite));
        assert_eq!(attribute.modified_write, Lookup::Value(ModifiedWrite::OneToClear));
        assert_eq!(attribute.read_action, Lookup::Unset);
    }

    #[test]
    fn read_side_effects() {
        let attribute = StandardCodes.decode("RC");
        assert_eq!(attribute.access.value(), Some(Access::ReadOnly));
        assert_eq!(attribute.read_action.value(), Some(ReadAction::Clear));
        assert_eq!(attribute.modified_write.value(), None);
    }

    #[test]
    fn empty_and_unknown() {
        assert_eq!(StandardCodes.decode("  "), Attribute::UNSET);
        let attribute = StandardCodes.decode("RWX");
        assert!(attribute.access.is_unknown());
        assert!(attribute.modified_write.is_unknown());
        assert!(attribute.read_action.is_unknown());
    }
}

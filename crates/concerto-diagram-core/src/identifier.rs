//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for diagram node ids. Node ids are
//! namespace-qualified declaration names such as `org.acme@1.0.0.Person`.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// Copying and comparing an `Id` is a symbol operation; the string is only
/// looked up when the identifier is displayed or serialized.
///
/// # Examples
///
/// ```
/// use concerto_diagram_core::identifier::Id;
///
/// let person = Id::qualified("org.acme@1.0.0", "Person");
/// assert_eq!(person, "org.acme@1.0.0.Person");
///
/// let same: Id = "org.acme@1.0.0.Person".into();
/// assert_eq!(person, same);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the id of a declaration from its namespace and short name.
    ///
    /// The two parts are joined with a `.`. An empty namespace yields the
    /// bare name.
    ///
    /// # Examples
    ///
    /// ```
    /// use concerto_diagram_core::identifier::Id;
    ///
    /// assert_eq!(Id::qualified("org.acme", "Widget"), "org.acme.Widget");
    /// assert_eq!(Id::qualified("", "Widget"), "Widget");
    /// ```
    pub fn qualified(namespace: &str, name: &str) -> Self {
        if namespace.is_empty() {
            Self::new(name)
        } else {
            Self::new(&format!("{namespace}.{name}"))
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

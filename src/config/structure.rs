//! Declared field sets and structure squashing.
//!
//! A [`Structure`] lists its fields into a [`FieldSet`]. Embedded
//! structures are squashed: their fields join the parent's set one level
//! deeper, and on a name collision the shallowest field wins. The set is
//! resolved once, before any input key is matched.

use crate::config::decode::Decode;
use crate::config::normalize::normalize;

/// A type whose named fields can be populated by the decoder.
///
/// Usually implemented through the [`structure!`](crate::structure) macro.
pub trait Structure {
    /// Register every field (and every squashed sub-structure) into `set`.
    fn fields<'a>(&'a mut self, set: &mut FieldSet<'a>);
}

/// One decodable field after flattening.
pub(crate) struct Field<'a> {
    pub(crate) name: &'static str,
    pub(crate) key: String,
    depth: usize,
    pub(crate) target: &'a mut dyn Decode,
}

/// Effective field set of a structure, including squashed fields.
#[derive(Default)]
pub struct FieldSet<'a> {
    entries: Vec<Field<'a>>,
    depth: usize,
}

impl<'a> FieldSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field under its external name.
    pub fn field(&mut self, name: &'static str, target: &'a mut dyn Decode) {
        self.entries.push(Field {
            name,
            key: normalize(name),
            depth: self.depth,
            target,
        });
    }

    /// Promote the fields of an embedded structure into this set.
    pub fn squash<S: Structure + ?Sized>(&mut self, inner: &'a mut S) {
        self.depth += 1;
        inner.fields(self);
        self.depth -= 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop shadowed fields. Shallower fields win; at equal depth the
    /// first declaration wins.
    pub(crate) fn resolve(self) -> Vec<Field<'a>> {
        let mut resolved: Vec<Field<'a>> = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            match resolved.iter().position(|f| f.key == entry.key) {
                Some(i) if entry.depth < resolved[i].depth => resolved[i] = entry,
                Some(_) => {}
                None => resolved.push(entry),
            }
        }
        resolved
    }
}

/// Implement [`Structure`] and [`Decode`] for a struct.
///
/// ```
/// use appkit::structure;
///
/// #[derive(Debug, Default)]
/// struct Retry {
///     max_retries: u32,
/// }
/// structure!(Retry { max_retries });
///
/// #[derive(Debug, Default)]
/// struct Job {
///     name: String,
///     retry: Retry,
///     url: String,
/// }
/// structure!(Job { name, #[squash] retry, url = "endpoint" });
/// ```
///
/// `#[squash] field` promotes the fields of `field` to this level and
/// `field = "name"` matches the field under a different external name.
#[macro_export]
macro_rules! structure {
    ($ty:ident { $($fields:tt)* }) => {
        impl $crate::config::structure::Structure for $ty {
            fn fields<'a>(&'a mut self, set: &mut $crate::config::structure::FieldSet<'a>) {
                $crate::structure!(@fields self, set, $($fields)*);
            }
        }

        impl $crate::config::decode::Decode for $ty {
            fn decode(
                &mut self,
                input: &$crate::config::decode::Value,
                cx: &$crate::config::decode::Context<'_>,
            ) -> ::std::result::Result<(), $crate::config::decode::DecodeError> {
                $crate::config::decode::decode_struct(self, input, cx)
            }
        }
    };
    (@fields $this:ident, $set:ident, ) => {};
    (@fields $this:ident, $set:ident, #[squash] $field:ident $(, $($rest:tt)*)?) => {
        $set.squash(&mut $this.$field);
        $crate::structure!(@fields $this, $set, $($($rest)*)?);
    };
    (@fields $this:ident, $set:ident, $field:ident = $name:literal $(, $($rest:tt)*)?) => {
        $set.field($name, &mut $this.$field);
        $crate::structure!(@fields $this, $set, $($($rest)*)?);
    };
    (@fields $this:ident, $set:ident, $field:ident $(, $($rest:tt)*)?) => {
        $set.field(stringify!($field), &mut $this.$field);
        $crate::structure!(@fields $this, $set, $($($rest)*)?);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Inner {
        name: String,
        port: u16,
    }
    crate::structure!(Inner { name, port });

    #[derive(Default)]
    struct Outer {
        inner: Inner,
        name: String,
        timeout_ms: u64,
    }
    crate::structure!(Outer { #[squash] inner, name, timeout_ms = "timeout" });

    fn keys(target: &mut Outer) -> Vec<(&'static str, String)> {
        let mut set = FieldSet::new();
        target.fields(&mut set);
        set.resolve().into_iter().map(|f| (f.name, f.key)).collect()
    }

    #[test]
    fn test_squashed_fields_are_promoted() {
        let mut outer = Outer::default();
        let keys = keys(&mut outer);
        assert!(keys.contains(&("port", "port".to_string())));
        assert!(keys.contains(&("timeout", "timeout".to_string())));
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_parent_field_wins_collision() {
        let mut outer = Outer::default();
        let mut set = FieldSet::new();
        outer.fields(&mut set);
        assert_eq!(set.len(), 4);

        let resolved = set.resolve();
        let name = resolved.iter().find(|f| f.key == "name").unwrap();
        assert_eq!(name.depth, 0);
    }
}

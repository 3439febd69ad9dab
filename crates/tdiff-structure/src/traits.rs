use std::io::{self, Read};

/// Child enumeration for comparison inputs.
///
/// Returning `None` means the input is a leaf. An empty container returns
/// `Some(vec![])` and is still treated as a container by the engine.
///
/// Any closure `Fn(&T) -> Option<Vec<T>>` is a provider, which is the usual
/// way to override structure at a single call site.
pub trait StructureProvider<T> {
    /// The ordered children of `input`, or `None` for a leaf.
    fn children(&self, input: &T) -> Option<Vec<T>>;
}

impl<T, F> StructureProvider<T> for F
where
    F: Fn(&T) -> Option<Vec<T>>,
{
    fn children(&self, input: &T) -> Option<Vec<T>> {
        self(input)
    }
}

/// Leaf content equality for comparison inputs.
///
/// Implementations must be reflexive and must treat two inputs that both
/// lack byte content as equal.
pub trait ContentEquality<T> {
    fn contents_equal(&self, a: &T, b: &T) -> bool;
}

impl<T, F> ContentEquality<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn contents_equal(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// An input type that knows its own child list.
///
/// The default method reports a leaf, so types that never contain anything
/// only need an empty `impl`.
pub trait Structured: Sized {
    fn children(&self) -> Option<Vec<Self>> {
        None
    }
}

/// The default [`StructureProvider`]: asks the input itself via
/// [`Structured`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStructure;

impl<T: Structured> StructureProvider<T> for DefaultStructure {
    fn children(&self, input: &T) -> Option<Vec<T>> {
        input.children()
    }
}

/// An input that may expose byte content as a stream.
pub trait ContentSource {
    /// Open the byte content.
    ///
    /// `Ok(None)` means the input has no byte content (a directory, a
    /// synthetic node). Errors are reported to the caller; the default
    /// equality treats them as "no byte content".
    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(None)
    }
}

/// Display name of an input.
///
/// Names identify result nodes (by their root-to-node path) and label
/// progress and CLI output.
pub trait Named {
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Plain strings and byte vectors are leaves whose content is themselves.
// ---------------------------------------------------------------------------

impl Structured for String {}

impl ContentSource for String {
    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(Some(Box::new(self.as_bytes())))
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

impl Structured for &str {}

impl ContentSource for &str {
    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(Some(Box::new(self.as_bytes())))
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

impl Structured for Vec<u8> {}

impl ContentSource for Vec<u8> {
    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(Some(Box::new(self.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Opaque(u32);

    impl Structured for Opaque {}

    #[test]
    fn default_structure_reports_leaf_for_opaque_inputs() {
        assert_eq!(DefaultStructure.children(&Opaque(1)), None);
        assert_eq!(DefaultStructure.children(&"text"), None);
    }

    #[test]
    fn closure_overrides_structure() {
        let provider = |n: &u32| if *n > 0 { Some(vec![n - 1]) } else { None };
        assert_eq!(provider.children(&2), Some(vec![1]));
        assert_eq!(provider.children(&0), None);
    }

    #[test]
    fn closure_overrides_equality() {
        let eq = |a: &String, b: &String| a.eq_ignore_ascii_case(b);
        assert!(eq.contents_equal(&"ABC".to_string(), &"abc".to_string()));
    }

    #[test]
    fn strings_expose_their_bytes() {
        let s = String::from("hello");
        let mut buf = Vec::new();
        s.open().unwrap().unwrap().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"hello");
        assert_eq!(s.name(), "hello");
    }
}

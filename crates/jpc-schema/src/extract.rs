//! # Field Extractors
//!
//! An extractor maps a borrowed source object to the value of one field.
//! It must be pure: object schemas call it once per render, and any number
//! of renders may run against the same extractor concurrently.
//!
//! Two adapters cover the ordinary cases:
//!
//! - [`Project`] wraps `Fn(&O) -> &V`. Member access (`|f: &Foo| &f.a`),
//!   accessor methods (`Foo::name`) and dereferences (`|f| &*f.boxed`)
//!   all take this form.
//! - [`Compute`] wraps `Fn(&O) -> V` for values that only exist once
//!   computed, such as `|f| f.items.len()`.
//!
//! Build them with [`project`] and [`compute`]. Anything else implements
//! [`Extractor`] directly.

/// Produces the `V` of a source object `O` and lends it to a callback.
///
/// The callback form lets borrowed and computed values share one
/// interface: a projection lends a reference into the source, a
/// computation lends a temporary.
pub trait Extractor<O: ?Sized, V: ?Sized> {
    fn with_value<R>(&self, source: &O, f: impl FnOnce(&V) -> R) -> R;
}

/// Extractor lending a reference into the source object.
#[derive(Clone, Copy)]
pub struct Project<F>(pub F);

/// Wrap a projection. Going through this function rather than the tuple
/// constructor ties the closure's output lifetime to its input.
pub fn project<O: ?Sized, V: ?Sized, F>(f: F) -> Project<F>
where
    F: Fn(&O) -> &V,
{
    Project(f)
}

impl<O: ?Sized, V: ?Sized, F> Extractor<O, V> for Project<F>
where
    F: Fn(&O) -> &V,
{
    fn with_value<R>(&self, source: &O, f: impl FnOnce(&V) -> R) -> R {
        f((self.0)(source))
    }
}

/// Extractor lending a freshly computed value.
#[derive(Clone, Copy)]
pub struct Compute<F>(pub F);

pub fn compute<O: ?Sized, V, F>(f: F) -> Compute<F>
where
    F: Fn(&O) -> V,
{
    Compute(f)
}

impl<O: ?Sized, V, F> Extractor<O, V> for Compute<F>
where
    F: Fn(&O) -> V,
{
    fn with_value<R>(&self, source: &O, f: impl FnOnce(&V) -> R) -> R {
        f(&(self.0)(source))
    }
}
